use crate::section::{Section, UiControl};
use crate::state::ControlState;
use forms_protocol::PartKind;
use std::collections::HashMap;

/// Position in the wizard: indices into the section list and into that
/// section's control list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub section: usize,
    pub control: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSummary {
    pub done: usize,
    pub total: usize,
    pub pct: u8,
}

/// A control is done when every mapped field among policy and practice holds
/// a non-empty value. Controls mapping neither are trivially done; info and
/// attachments are never required.
pub fn control_done(control: &UiControl, state: Option<&ControlState>) -> bool {
    let required: Vec<PartKind> = [PartKind::Policy, PartKind::Practice]
        .into_iter()
        .filter(|kind| control.parts.get(*kind).is_some())
        .collect();

    if required.is_empty() {
        return true;
    }
    let Some(state) = state else {
        return false;
    };
    required
        .into_iter()
        .all(|kind| state.field(kind).map(|value| !value.is_empty()).unwrap_or(false))
}

pub fn section_done(section: &Section, states: &HashMap<i64, ControlState>) -> bool {
    section
        .controls
        .iter()
        .all(|control| control_done(control, states.get(&control.id)))
}

/// Done count over all controls, as a rounded integer percentage. A form
/// with zero controls reports 0% (the divisor is clamped to 1).
pub fn overall_progress(
    sections: &[Section],
    states: &HashMap<i64, ControlState>,
) -> ProgressSummary {
    let total: usize = sections.iter().map(|section| section.controls.len()).sum();
    let done = sections
        .iter()
        .flat_map(|section| section.controls.iter())
        .filter(|control| control_done(control, states.get(&control.id)))
        .count();

    let pct = ((100.0 * done as f64) / total.max(1) as f64).round() as u8;
    ProgressSummary { done, total, pct }
}

/// Advance within the current section, or cross into the next section's
/// first control. Saturates at the last control of the last section.
pub fn next_cursor(sections: &[Section], cursor: Cursor) -> Cursor {
    let Some(section) = sections.get(cursor.section) else {
        return cursor;
    };
    if cursor.control + 1 < section.controls.len() {
        return Cursor {
            section: cursor.section,
            control: cursor.control + 1,
        };
    }
    if cursor.section + 1 < sections.len() {
        return Cursor {
            section: cursor.section + 1,
            control: 0,
        };
    }
    cursor
}

/// Step back within the section, or to the last control of the previous
/// section. Saturates at the very first control.
pub fn prev_cursor(sections: &[Section], cursor: Cursor) -> Cursor {
    if cursor.control > 0 {
        return Cursor {
            section: cursor.section,
            control: cursor.control - 1,
        };
    }
    if cursor.section > 0 {
        let section = cursor.section - 1;
        let control = sections
            .get(section)
            .map(|s| s.controls.len().saturating_sub(1))
            .unwrap_or(0);
        return Cursor { section, control };
    }
    cursor
}
