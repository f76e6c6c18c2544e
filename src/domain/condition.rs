use serde::{Deserialize, Serialize};

/// Product attribute a price rule condition can test.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConditionField {
    SellingPrice,
    Name,
    BrandName,
    Regions,
}

impl ConditionField {
    /// All fields, in the order they are offered to the operator.
    pub const ALL: [ConditionField; 4] = [
        ConditionField::SellingPrice,
        ConditionField::Name,
        ConditionField::BrandName,
        ConditionField::Regions,
    ];

    /// Operators legal for this field. The first entry is the default
    /// selected when the field is chosen.
    pub fn operators(self) -> &'static [ConditionOperator] {
        use ConditionOperator::*;
        match self {
            ConditionField::SellingPrice => &[Eq, Ne, Gt, Ge, Lt, Le],
            ConditionField::Name => &[Eq, Ne, Contains],
            ConditionField::BrandName => &[Eq, Ne],
            ConditionField::Regions => &[Contains],
        }
    }

    /// Default operator preselected for this field.
    pub fn default_operator(self) -> ConditionOperator {
        self.operators()[0]
    }

    /// Whether `operator` is legal for this field.
    pub fn allows(self, operator: ConditionOperator) -> bool {
        self.operators().contains(&operator)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConditionField::SellingPrice => "selling_price",
            ConditionField::Name => "name",
            ConditionField::BrandName => "brand_name",
            ConditionField::Regions => "regions",
        }
    }

    /// Human-readable label shown in the rule editor.
    pub fn label(self) -> &'static str {
        match self {
            ConditionField::SellingPrice => "Selling price",
            ConditionField::Name => "Product name",
            ConditionField::BrandName => "Brand",
            ConditionField::Regions => "Regions",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "selling_price" => Some(ConditionField::SellingPrice),
            "name" => Some(ConditionField::Name),
            "brand_name" => Some(ConditionField::BrandName),
            "regions" => Some(ConditionField::Regions),
            _ => None,
        }
    }
}

impl Default for ConditionField {
    fn default() -> Self {
        Self::Name
    }
}

/// Comparison applied between a condition field and its value.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum ConditionOperator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "contains")]
    Contains,
}

impl ConditionOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            ConditionOperator::Eq => "=",
            ConditionOperator::Ne => "!=",
            ConditionOperator::Gt => ">",
            ConditionOperator::Ge => ">=",
            ConditionOperator::Lt => "<",
            ConditionOperator::Le => "<=",
            ConditionOperator::Contains => "contains",
        }
    }

    /// Human-readable label shown in the rule editor.
    pub fn label(self) -> &'static str {
        match self {
            ConditionOperator::Eq => "equals",
            ConditionOperator::Ne => "not equal",
            ConditionOperator::Gt => "greater than",
            ConditionOperator::Ge => "greater or equal",
            ConditionOperator::Lt => "less than",
            ConditionOperator::Le => "less or equal",
            ConditionOperator::Contains => "contains",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "=" => Some(ConditionOperator::Eq),
            "!=" => Some(ConditionOperator::Ne),
            ">" => Some(ConditionOperator::Gt),
            ">=" => Some(ConditionOperator::Ge),
            "<" => Some(ConditionOperator::Lt),
            "<=" => Some(ConditionOperator::Le),
            "contains" => Some(ConditionOperator::Contains),
            _ => None,
        }
    }
}

/// One (field, operator, value) test inside a price rule.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Condition {
    /// Client-generated identifier, stable for the life of the draft.
    pub id: String,
    pub field: ConditionField,
    pub operator: ConditionOperator,
    /// Raw value entered by the operator; interpretation depends on `field`.
    pub value: String,
}

impl Condition {
    /// A fresh condition with the default field and its default operator.
    pub fn new(id: impl Into<String>) -> Self {
        let field = ConditionField::default();
        Self {
            id: id.into(),
            field,
            operator: field.default_operator(),
            value: String::new(),
        }
    }

    /// Whether the stored operator is legal for the stored field.
    pub fn is_operator_legal(&self) -> bool {
        self.field.allows(self.operator)
    }
}
