use sectree::{
    BranchState, ChangeDescriptor, EngineSettings, IndexPath, ItemRenderer,
    Section,
};
use serde::Serialize;

use crate::entry::Entry;

/// One printed line with the height hint the engine was configured with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub text: String,
    pub height: f32,
}

/// Plain text renderer for [`Entry`] items.
pub struct TextRenderer {
    row_height: f32,
    header_height: f32,
}

impl TextRenderer {
    pub fn new(settings: &EngineSettings) -> Self {
        Self {
            row_height: settings.row_height,
            header_height: settings.header_height,
        }
    }

    pub fn render_all(&self, sections: &[Section<Entry>]) -> Vec<Vec<Line>> {
        sections
            .iter()
            .map(|section| self.render_section(section))
            .collect()
    }
}

impl ItemRenderer<Entry> for TextRenderer {
    type Output = Line;

    fn render_row(&self, element: &Entry) -> Line {
        Line {
            text: format!("    {}", element.label()),
            height: self.row_height,
        }
    }

    fn render_header(&self, element: &Entry, state: BranchState) -> Line {
        let marker = match state {
            BranchState::Expanded => 'v',
            BranchState::Collapsed => '>',
        };
        Line {
            text: format!("{marker} {}", element.label()),
            height: self.header_height,
        }
    }
}

pub fn sections_text(rendered: &[Vec<Line>]) -> String {
    let mut out = String::new();
    for (index, lines) in rendered.iter().enumerate() {
        for (offset, line) in lines.iter().enumerate() {
            if offset == 0 {
                out.push_str(&format!("[{index}] {}\n", line.text));
            } else {
                out.push_str(&format!("    {}\n", line.text));
            }
        }
    }
    out
}

pub fn change_text(change: &ChangeDescriptor) -> String {
    let Some(batch) = change.edit() else {
        return "no visible change".to_string();
    };

    let mut parts = Vec::new();
    if !batch.remove_rows.is_empty() {
        parts.push(format!("remove rows {}", paths(&batch.remove_rows)));
    }
    if !batch.remove_sections.is_empty() {
        parts.push(format!("remove sections {:?}", batch.remove_sections));
    }
    if !batch.insert_sections.is_empty() {
        parts.push(format!("insert sections {:?}", batch.insert_sections));
    }
    if !batch.insert_rows.is_empty() {
        parts.push(format!("insert rows {}", paths(&batch.insert_rows)));
    }
    parts.join("; ")
}

fn paths(paths: &[IndexPath]) -> String {
    let rendered: Vec<String> = paths
        .iter()
        .map(|path| format!("{}.{}", path.section, path.row))
        .collect();
    rendered.join(", ")
}
