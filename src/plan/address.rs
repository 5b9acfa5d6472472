//! Resource address resolution
//!
//! Turns a resource comment such as
//! `# module.vpc.aws_subnet.public["a"] will be created` into the update
//! type, tainted flag and the parts of the resource address.

use super::error::{PlanParseError, Result};
use super::line::dequote;
use super::types::{AttributeChange, ResourceChange, ResourceIndex, UpdateType};

/// Trailing phrases of resource comments; "tainted" must be tried before
/// the plain "must be replaced" it ends with
const RESOURCE_PHRASES: [(&str, UpdateType, bool); 6] = [
    (" will be created", UpdateType::New, false),
    (" will be read during apply", UpdateType::Read, false),
    (
        " will be updated in-place",
        UpdateType::UpdateInPlace,
        false,
    ),
    (
        " is tainted, so must be replaced",
        UpdateType::ForceReplace,
        true,
    ),
    (" must be replaced", UpdateType::ForceReplace, false),
    (" will be destroyed", UpdateType::Destroy, false),
];

/// The components of a resource address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceAddress {
    /// The address exactly as written
    pub address: String,
    pub module_address: String,
    pub resource_type: String,
    pub resource_name: String,
    pub index: Option<ResourceIndex>,
}

impl ResourceAddress {
    /// Resolve a raw address
    pub fn parse(address: &str) -> Result<Self> {
        let (base, index) = split_index(address);

        let segments = split_segments(base);
        let segments = strip_data_segments(&segments);

        let mut module_parts = Vec::new();
        let mut remaining = Vec::new();
        let mut iter = segments.into_iter().peekable();
        while let Some(segment) = iter.next() {
            match iter.next_if(|_| segment == "module") {
                Some(module_name) => module_parts.push(format!("module.{}", module_name)),
                None => remaining.push(segment),
            }
        }

        let [.., resource_type, resource_name] = remaining.as_slice() else {
            return Err(PlanParseError::UnresolvableAddress {
                line_number: 0,
                address: address.to_string(),
            });
        };

        Ok(Self {
            address: address.to_string(),
            module_address: module_parts.join("."),
            resource_type: resource_type.to_string(),
            resource_name: resource_name.to_string(),
            index,
        })
    }
}

/// A parsed resource comment line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceComment {
    pub address: ResourceAddress,
    pub update_type: UpdateType,
    pub tainted: bool,
}

impl ResourceComment {
    /// Parse a resource comment line
    pub fn parse(comment: &str) -> Result<Self> {
        let comment = comment.trim();
        let text = comment
            .strip_prefix('#')
            .ok_or_else(|| PlanParseError::malformed(comment, "not a resource comment"))?
            .trim_start();

        let (address, update_type, tainted) = RESOURCE_PHRASES
            .iter()
            .find_map(|(phrase, update_type, tainted)| {
                text.strip_suffix(phrase)
                    .map(|address| (address.trim(), *update_type, *tainted))
            })
            .ok_or_else(|| PlanParseError::malformed(comment, "unknown resource change phrase"))?;

        Ok(Self {
            address: ResourceAddress::parse(address)?,
            update_type,
            tainted,
        })
    }

    /// Complete the resource with its parsed attributes
    pub fn into_resource(self, attributes: Vec<AttributeChange>) -> ResourceChange {
        ResourceChange {
            address: self.address.address,
            module_address: self.address.module_address,
            resource_type: self.address.resource_type,
            resource_name: self.address.resource_name,
            index: self.address.index,
            update_type: self.update_type,
            tainted: self.tainted,
            attributes,
        }
    }
}

/// Split a trailing `[index]` off the address
///
/// Done before splitting on `.` because string keys may contain dots.
fn split_index(address: &str) -> (&str, Option<ResourceIndex>) {
    let Some(without_bracket) = address.strip_suffix(']') else {
        return (address, None);
    };

    let open = if without_bracket.ends_with('"') {
        without_bracket.rfind("[\"")
    } else {
        without_bracket.rfind('[')
    };
    let Some(open) = open else {
        return (address, None);
    };

    let raw = &without_bracket[open + 1..];
    let index = if raw.starts_with('"') {
        ResourceIndex::String(dequote(raw).to_string())
    } else {
        match raw.parse::<i64>() {
            Ok(i) => ResourceIndex::Integer(i),
            Err(_) => ResourceIndex::String(raw.to_string()),
        }
    };

    (&address[..open], Some(index))
}

/// Split on `.` outside of brackets and quotes, so module instance keys
/// such as `module.app["eu.west"]` stay intact
fn split_segments(address: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut start = 0;

    for (i, c) in address.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '[' if !in_quotes => depth += 1,
            ']' if !in_quotes => depth = depth.saturating_sub(1),
            '.' if !in_quotes && depth == 0 => {
                segments.push(&address[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(&address[start..]);

    segments
}

/// Drop the `data` marker of data source addresses
///
/// A `data` segment is kept when the previous segment is `module` or `data`
/// (a module or data source literally named "data"), or when removing it
/// would leave fewer than two segments after it (a type or name "data").
/// This is a heuristic and does not cover every naming collision.
fn strip_data_segments<'a>(segments: &[&'a str]) -> Vec<&'a str> {
    segments
        .iter()
        .enumerate()
        .filter(|&(k, segment)| {
            let previous = if k == 0 { "" } else { segments[k - 1] };
            let removable = *segment == "data"
                && previous != "module"
                && previous != "data"
                && segments.len() - k > 2;
            !removable
        })
        .map(|(_, segment)| *segment)
        .collect()
}
