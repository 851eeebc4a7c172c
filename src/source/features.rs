use std::collections::BTreeMap;

/// Label pairs handed to the label consumer.
pub type FeatureLabels = BTreeMap<String, String>;

/// Named key/value elements discovered by a source.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct AttributeFeatureSet {
    pub elements: BTreeMap<String, String>,
}

impl AttributeFeatureSet {
    pub fn new(elements: BTreeMap<String, String>) -> Self {
        Self { elements }
    }
}

/// Everything a source discovered in one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct Features {
    pub attributes: BTreeMap<String, AttributeFeatureSet>,
}

impl Features {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the attribute feature set named `name`, if any.
    pub fn attribute_set(&self, name: &str) -> Option<&AttributeFeatureSet> {
        self.attributes.get(name)
    }
}
