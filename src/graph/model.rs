use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::GraphError;
use crate::util::format_number;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Area,
    Target,
    Compound,
    Paper,
    Model,
    Regulator,
}

impl Category {
    pub const ALL: [Self; 6] = [
        Self::Area,
        Self::Target,
        Self::Compound,
        Self::Paper,
        Self::Model,
        Self::Regulator,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Self::Area => "area",
            Self::Target => "target",
            Self::Compound => "compound",
            Self::Paper => "paper",
            Self::Model => "model",
            Self::Regulator => "regulator",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Area => "Areas",
            Self::Target => "Targets",
            Self::Compound => "Drugs",
            Self::Paper => "Papers",
            Self::Model => "ML Models",
            Self::Regulator => "Regulators",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.tag() == tag)
    }
}

/// The active type filter: every category, or exactly one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Filter {
    #[default]
    All,
    Only(Category),
}

impl Filter {
    pub fn admits(self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => only == category,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Only(category) => category.label(),
        }
    }

    pub fn choices() -> impl Iterator<Item = Self> {
        std::iter::once(Self::All).chain(Category::ALL.into_iter().map(Self::Only))
    }
}

impl FromStr for Filter {
    type Err = GraphError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }

        Category::from_tag(&value.to_ascii_lowercase())
            .map(Self::Only)
            .ok_or_else(|| GraphError::UnknownFilter {
                tag: value.to_string(),
            })
    }
}

/// Category-specific attribute record, tagged by the payload's `type` field.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Attributes {
    Area {
        #[serde(default)]
        market: Vec<String>,
        #[serde(default)]
        papers: Option<u32>,
    },
    Target {
        #[serde(default)]
        pathway: Option<String>,
    },
    Compound {
        #[serde(default)]
        moa: Option<String>,
        #[serde(default)]
        approved: Vec<String>,
    },
    Paper {
        #[serde(default)]
        journal: Option<String>,
        #[serde(default)]
        n: Option<u32>,
        #[serde(default)]
        hr: Option<f64>,
    },
    Model {
        #[serde(default)]
        auc: Option<f64>,
        #[serde(default)]
        framework: Option<String>,
    },
    Regulator {
        #[serde(default)]
        market: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AttributeValue<'a> {
    Text(&'a str),
    Number(f64),
    List(&'a [String]),
}

impl fmt::Display for AttributeValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(value) => f.write_str(&format_number(*value)),
            Self::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

fn text_row<'a>(
    name: &'static str,
    value: &'a Option<String>,
) -> Option<(&'static str, AttributeValue<'a>)> {
    value.as_deref().map(|value| (name, AttributeValue::Text(value)))
}

impl Attributes {
    pub fn category(&self) -> Category {
        match self {
            Self::Area { .. } => Category::Area,
            Self::Target { .. } => Category::Target,
            Self::Compound { .. } => Category::Compound,
            Self::Paper { .. } => Category::Paper,
            Self::Model { .. } => Category::Model,
            Self::Regulator { .. } => Category::Regulator,
        }
    }

    /// Present attributes as `(name, value)` rows; absent optional fields are skipped.
    pub fn fields(&self) -> Vec<(&'static str, AttributeValue<'_>)> {
        let mut rows = Vec::new();

        match self {
            Self::Area { market, papers } => {
                if !market.is_empty() {
                    rows.push(("market", AttributeValue::List(market)));
                }
                if let Some(papers) = papers {
                    rows.push(("papers", AttributeValue::Number(f64::from(*papers))));
                }
            }
            Self::Target { pathway } => rows.extend(text_row("pathway", pathway)),
            Self::Compound { moa, approved } => {
                rows.extend(text_row("moa", moa));
                if !approved.is_empty() {
                    rows.push(("approved", AttributeValue::List(approved)));
                }
            }
            Self::Paper { journal, n, hr } => {
                rows.extend(text_row("journal", journal));
                if let Some(n) = n {
                    rows.push(("n", AttributeValue::Number(f64::from(*n))));
                }
                if let Some(hr) = hr {
                    rows.push(("hr", AttributeValue::Number(*hr)));
                }
            }
            Self::Model { auc, framework } => {
                if let Some(auc) = auc {
                    rows.push(("auc", AttributeValue::Number(*auc)));
                }
                rows.extend(text_row("framework", framework));
            }
            Self::Regulator { market } => rows.extend(text_row("market", market)),
        }

        rows
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Vertex {
    pub id: String,
    pub label: String,
    #[serde(default, rename = "full", skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl Vertex {
    pub fn category(&self) -> Category {
        self.attributes.category()
    }
}

fn default_weight() -> f32 {
    1.0
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    #[serde(rename = "rel")]
    pub relation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default = "default_weight")]
    pub weight: f32,
}
