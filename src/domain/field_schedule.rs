use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of one report field, also used as the placeholder name in
/// the report template.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(String);

impl FieldId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Reserved id under which the investigator selection is recorded.
    /// Not part of the collection schedule.
    pub fn investigator() -> Self {
        Self::new("Investigator")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How the rewrite collaborator is instructed to polish a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteStyle {
    /// Formal professional Arabic, emotions avoided.
    Professional,
    /// Exact output format: day/month-name/year.
    StrictDate,
    /// Analytical register for the technical opinion section.
    Analytical,
}

#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub id: FieldId,
    /// Prompt shown to the user when this field is up next.
    pub prompt: String,
    /// Display label used in confirmations and rewrite instructions.
    pub label: String,
    pub style: RewriteStyle,
}

impl FieldDescriptor {
    pub fn new(
        id: impl Into<String>,
        prompt: impl Into<String>,
        label: impl Into<String>,
        style: RewriteStyle,
    ) -> Self {
        Self {
            id: FieldId::new(id),
            prompt: prompt.into(),
            label: label.into(),
            style,
        }
    }
}

/// Ordered, immutable list of the report fields to collect. Order defines
/// the collection sequence and is never reordered mid-session.
#[derive(Debug, Clone)]
pub struct FieldSchedule {
    fields: Vec<FieldDescriptor>,
}

impl FieldSchedule {
    /// Ids must be unique and the reserved investigator id may not appear
    /// in the schedule.
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        let mut seen = HashSet::new();
        for field in &fields {
            assert!(
                field.id != FieldId::investigator(),
                "reserved field id in schedule: {}",
                field.id
            );
            assert!(seen.insert(field.id.clone()), "duplicate field id: {}", field.id);
        }
        Self { fields }
    }

    /// The examination report schedule collected by the bot.
    pub fn standard() -> Self {
        Self::new(vec![
            FieldDescriptor::new(
                "Date",
                "🎙️ أرسل تاريخ الواقعة.",
                "التاريخ",
                RewriteStyle::StrictDate,
            ),
            FieldDescriptor::new(
                "Briefing",
                "🎙️ أرسل موجز الواقعة.",
                "موجز الواقعة",
                RewriteStyle::Professional,
            ),
            FieldDescriptor::new(
                "LocationObservations",
                "🎙️ أرسل معاينة الموقع.",
                "معاينة الموقع",
                RewriteStyle::Professional,
            ),
            FieldDescriptor::new(
                "Examination",
                "🎙️ أرسل نتيجة الفحص الفني.",
                "نتيجة الفحص الفني",
                RewriteStyle::Professional,
            ),
            FieldDescriptor::new(
                "Outcomes",
                "🎙️ أرسل النتيجة.",
                "النتيجة",
                RewriteStyle::Professional,
            ),
            FieldDescriptor::new(
                "TechnicalOpinion",
                "🎙️ أرسل الرأي الفني.",
                "الرأي الفني",
                RewriteStyle::Analytical,
            ),
        ])
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&FieldDescriptor> {
        self.fields.get(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter()
    }
}
