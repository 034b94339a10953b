use super::{FieldId, FieldSchedule, Session};

/// One rendered section of the finished report, in schedule order.
#[derive(Debug, Clone)]
pub struct ReportSection {
    pub id: FieldId,
    pub label: String,
    pub text: String,
}

/// The complete field mapping handed to the document renderer once every
/// schedule field has been collected.
#[derive(Debug, Clone)]
pub struct CompletedReport {
    pub investigator: String,
    pub sections: Vec<ReportSection>,
}

impl CompletedReport {
    /// Builds the report from a finished session. Returns `None` when the
    /// session is missing the investigator or any schedule field, which a
    /// session that honored the collection invariant cannot be.
    pub fn from_session(schedule: &FieldSchedule, session: &Session) -> Option<Self> {
        let investigator = session.investigator()?.to_string();
        let mut sections = Vec::with_capacity(schedule.len());
        for descriptor in schedule.iter() {
            let text = session.values.get(&descriptor.id)?;
            sections.push(ReportSection {
                id: descriptor.id.clone(),
                label: descriptor.label.clone(),
                text: text.clone(),
            });
        }
        Some(Self {
            investigator,
            sections,
        })
    }
}
