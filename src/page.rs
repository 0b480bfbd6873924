use std::io::{self, Write};

/// One selectable entry, bound to the file at `index` in the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub index: usize,
    pub label: String,
}

/// The surface controls get appended to.
pub trait Page: Send {
    fn append_control(&mut self, control: &Control) -> io::Result<()>;
}

/// Prints controls as a numbered list.
pub struct ConsolePage<W: Write + Send> {
    out: W,
}

impl ConsolePage<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write + Send> ConsolePage<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Page for ConsolePage<W> {
    fn append_control(&mut self, control: &Control) -> io::Result<()> {
        writeln!(self.out, "[{}] {}", control.index + 1, control.label)
    }
}

/// Keeps appended controls in memory, in order.
#[derive(Debug, Default, Clone)]
pub struct ControlList {
    pub controls: Vec<Control>,
}

impl Page for ControlList {
    fn append_control(&mut self, control: &Control) -> io::Result<()> {
        self.controls.push(control.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_page_numbers_from_one() {
        let mut page = ConsolePage::new(Vec::new());
        page.append_control(&Control {
            index: 0,
            label: "tree/a.json".into(),
        })
        .unwrap();
        page.append_control(&Control {
            index: 1,
            label: "tree/b.json".into(),
        })
        .unwrap();
        let text = String::from_utf8(page.into_inner()).unwrap();
        assert_eq!(text, "[1] tree/a.json\n[2] tree/b.json\n");
    }
}
