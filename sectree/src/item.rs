use crate::element::BranchState;
use crate::section::Section;

/// Item activated in the display layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListItem<E> {
    /// A row element.
    Cell(E),
    /// A section header with its state at activation time.
    Section(E, BranchState),
}

impl<E> ListItem<E> {
    pub fn element(&self) -> &E {
        match self {
            Self::Cell(element) | Self::Section(element, _) => element,
        }
    }

    pub fn is_section(&self) -> bool {
        matches!(self, Self::Section(..))
    }
}

/// Receives selections from the display layer.
pub trait SelectionSink<E> {
    fn selected(&mut self, item: ListItem<E>);
}

impl<E, F> SelectionSink<E> for F
where
    F: FnMut(ListItem<E>),
{
    fn selected(&mut self, item: ListItem<E>) {
        self(item)
    }
}

/// Turns elements into something the display layer can show.
///
/// Implemented by the display layer per payload type.
pub trait ItemRenderer<E> {
    type Output;

    fn render_row(&self, element: &E) -> Self::Output;

    fn render_header(&self, element: &E, state: BranchState) -> Self::Output;

    /// Render a header followed by its rows.
    fn render_section(&self, section: &Section<E>) -> Vec<Self::Output> {
        let mut rendered = Vec::with_capacity(section.row_count() + 1);
        rendered.push(self.render_header(&section.header, section.state));
        rendered.extend(section.rows.iter().map(|row| self.render_row(row)));
        rendered
    }
}
