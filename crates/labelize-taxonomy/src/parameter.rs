//! Typed parameter specifications
//!
//! A [`ParameterSpec`] fixes a label attribute's type and default when it is
//! created. Per-mention values travel as strings; checkbox values use the
//! literals `"true"` / `"false"`.

use crate::error::{TaxonomyError, TaxonomyResult};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Typed definition of a label attribute
///
/// Serialized form (descriptor `attributes` entries):
/// ```json
/// {"type": "dropdown", "options": ["author", "subject"], "default": "author"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SpecInput", into = "SpecRepr")]
pub enum ParameterSpec {
    /// Free text
    String {
        /// Default value
        default: String,
    },

    /// Boolean flag
    Checkbox {
        /// Default value
        default: bool,
    },

    /// One of a fixed, ordered set of options
    Dropdown {
        /// Unique options in display order
        options: Vec<String>,
        /// Default option, or `""` when there are no options
        default: String,
    },
}

/// Parameter type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    /// Free text
    String,
    /// Boolean flag
    Checkbox,
    /// Fixed option list
    Dropdown,
}

impl ParameterKind {
    /// Tag as written in descriptors
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Checkbox => "checkbox",
            Self::Dropdown => "dropdown",
        }
    }
}

impl Display for ParameterKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParameterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" => Ok(Self::String),
            "checkbox" => Ok(Self::Checkbox),
            "dropdown" => Ok(Self::Dropdown),
            other => Err(format!("unknown parameter type: {other}")),
        }
    }
}

impl ParameterSpec {
    /// Free-text parameter
    #[inline]
    #[must_use]
    pub fn string(default: impl Into<String>) -> Self {
        Self::String {
            default: default.into(),
        }
    }

    /// Checkbox parameter
    #[inline]
    #[must_use]
    pub fn checkbox(default: bool) -> Self {
        Self::Checkbox { default }
    }

    /// Dropdown parameter defaulting to its first option
    ///
    /// Options are trimmed; blank and repeated options are dropped.
    #[must_use]
    pub fn dropdown<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let options = normalize_options(options);
        let default = options.first().cloned().unwrap_or_default();
        Self::Dropdown { options, default }
    }

    /// Dropdown parameter with an explicit default
    ///
    /// # Errors
    /// `InvalidDefault` if `default` is not one of the options
    pub fn dropdown_with_default<I, S>(options: I, default: &str) -> TaxonomyResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let options = normalize_options(options);
        let default = default.trim();
        if !options.iter().any(|o| o == default) {
            return Err(TaxonomyError::InvalidDefault {
                kind: ParameterKind::Dropdown.as_str(),
                value: default.to_string(),
            });
        }
        Ok(Self::Dropdown {
            options,
            default: default.to_string(),
        })
    }

    /// Build a spec from loosely typed input (command line, forms)
    ///
    /// `default` is parsed according to `kind`; `None` selects the type's
    /// natural default.
    ///
    /// # Errors
    /// `InvalidDefault` if `default` is not valid for `kind`
    pub fn from_parts(
        kind: ParameterKind,
        default: Option<&str>,
        options: &[String],
    ) -> TaxonomyResult<Self> {
        match kind {
            ParameterKind::String => Ok(Self::string(default.unwrap_or_default().trim())),
            ParameterKind::Checkbox => match default {
                None => Ok(Self::checkbox(false)),
                Some(raw) => parse_bool(raw)
                    .map(Self::checkbox)
                    .ok_or_else(|| TaxonomyError::InvalidDefault {
                        kind: kind.as_str(),
                        value: raw.to_string(),
                    }),
            },
            ParameterKind::Dropdown => match default {
                None => Ok(Self::dropdown(options)),
                Some(raw) => Self::dropdown_with_default(options, raw),
            },
        }
    }

    /// Type tag
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ParameterKind {
        match self {
            Self::String { .. } => ParameterKind::String,
            Self::Checkbox { .. } => ParameterKind::Checkbox,
            Self::Dropdown { .. } => ParameterKind::Dropdown,
        }
    }

    /// Default rendered as a marker attribute value
    #[must_use]
    pub fn default_value(&self) -> String {
        match self {
            Self::String { default } | Self::Dropdown { default, .. } => default.clone(),
            Self::Checkbox { default } => bool_literal(*default).to_string(),
        }
    }

    /// Dropdown options (empty for other kinds)
    #[inline]
    #[must_use]
    pub fn options(&self) -> &[String] {
        match self {
            Self::Dropdown { options, .. } => options,
            _ => &[],
        }
    }

    /// Check whether `value` is a valid per-mention value for this spec
    #[must_use]
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Self::String { .. } => true,
            Self::Checkbox { .. } => value == "true" || value == "false",
            Self::Dropdown { options, .. } => {
                if options.is_empty() {
                    value.is_empty()
                } else {
                    options.iter().any(|o| o == value)
                }
            }
        }
    }

    /// Check the spec's own invariants
    ///
    /// Variants are public for matching, so specs assembled by hand are
    /// re-checked before they enter a taxonomy.
    ///
    /// # Errors
    /// `InvalidDefault` if the default is not a valid value of the spec
    pub fn validate(&self) -> TaxonomyResult<()> {
        let Self::Dropdown { options, default } = self else {
            return Ok(());
        };
        let unique = options
            .iter()
            .enumerate()
            .all(|(i, o)| !o.trim().is_empty() && !options[..i].contains(o));
        if !unique || !self.accepts(default) {
            return Err(TaxonomyError::InvalidDefault {
                kind: ParameterKind::Dropdown.as_str(),
                value: default.clone(),
            });
        }
        Ok(())
    }
}

impl Display for ParameterSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dropdown { options, default } => {
                write!(f, "dropdown [{}] = {default:?}", options.join(", "))
            }
            other => write!(f, "{} = {:?}", other.kind(), other.default_value()),
        }
    }
}

/// Parse a checkbox literal
#[must_use]
pub fn parse_bool(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Checkbox literal for a boolean
#[inline]
#[must_use]
pub fn bool_literal(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn normalize_options<I, S>(options: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for option in options {
        let option = option.as_ref().trim();
        if !option.is_empty() && !out.iter().any(|o| o == option) {
            out.push(option.to_string());
        }
    }
    out
}

/// Wire form written to descriptors
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum SpecRepr {
    String {
        #[serde(default)]
        default: String,
    },
    Checkbox {
        #[serde(default, deserialize_with = "lenient_bool")]
        default: bool,
    },
    Dropdown {
        #[serde(default)]
        options: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<String>,
    },
}

/// Accepted input: the typed record or the legacy bare-string form
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SpecInput {
    Typed(SpecRepr),
    Bare(String),
}

impl From<ParameterSpec> for SpecRepr {
    fn from(spec: ParameterSpec) -> Self {
        match spec {
            ParameterSpec::String { default } => Self::String { default },
            ParameterSpec::Checkbox { default } => Self::Checkbox { default },
            ParameterSpec::Dropdown { options, default } => Self::Dropdown {
                options,
                default: Some(default),
            },
        }
    }
}

impl TryFrom<SpecInput> for ParameterSpec {
    type Error = TaxonomyError;

    fn try_from(input: SpecInput) -> Result<Self, Self::Error> {
        match input {
            SpecInput::Bare(default) => Ok(Self::String { default }),
            SpecInput::Typed(SpecRepr::String { default }) => Ok(Self::String { default }),
            SpecInput::Typed(SpecRepr::Checkbox { default }) => Ok(Self::Checkbox { default }),
            SpecInput::Typed(SpecRepr::Dropdown { options, default }) => match default {
                Some(default) if !default.is_empty() => {
                    Self::dropdown_with_default(options, &default)
                }
                _ => Ok(Self::dropdown(options)),
            },
        }
    }
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Bool(b) => Ok(b),
        Value::Null => Ok(false),
        Value::String(s) if s.is_empty() => Ok(false),
        Value::String(s) => {
            parse_bool(&s).ok_or_else(|| de::Error::custom(format!("invalid checkbox default: {s}")))
        }
        other => Err(de::Error::custom(format!("invalid checkbox default: {other}"))),
    }
}
