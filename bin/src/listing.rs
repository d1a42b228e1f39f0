//! Plain-text [`LineSurface`] for terminal output.
//!
//! Each visible line renders as `<number> <icon> <text>`, with the ellipsis appended to
//! collapsed openers:
//!
//! ```text
//! 1 ▸ fn main() { ...
//! 5   fn other() {}
//! ```

use crate::config::Config;
use gcf_fold::{IconOrientation, LineSurface};

#[derive(Debug, Clone, Default)]
struct Decorations {
    hidden: bool,
    attached_count: u32,
    ellipsis: bool,
    icon: Option<IconOrientation>,
}

pub struct TextSurface {
    lines: Vec<String>,
    decorations: Vec<Decorations>,
    ellipsis: String,
    icon_open: String,
    icon_closed: String,
    line_numbers: bool,
}

impl TextSurface {
    /// Surface over the lines of `source`.
    pub fn new(source: &str, config: &Config) -> Self {
        let lines: Vec<String> = source.lines().map(str::to_string).collect();
        let decorations = vec![Decorations::default(); lines.len()];
        Self {
            lines,
            decorations,
            ellipsis: config.ellipsis.clone(),
            icon_open: config.icon_open.clone(),
            icon_closed: config.icon_closed.clone(),
            line_numbers: config.line_numbers,
        }
    }

    /// Render every visible line, newline-terminated.
    pub fn render(&self) -> String {
        let number_width = self.lines.len().to_string().len();
        let icon_width = self
            .icon_open
            .chars()
            .count()
            .max(self.icon_closed.chars().count());
        let blank_icon = " ".repeat(icon_width);

        let mut out = String::new();
        for (line, (text, decorations)) in self.lines.iter().zip(&self.decorations).enumerate() {
            if decorations.hidden {
                continue;
            }

            if self.line_numbers {
                out.push_str(&format!("{:>number_width$} ", line + 1));
            }

            let icon = match decorations.icon {
                Some(IconOrientation::Open) => self.icon_open.as_str(),
                Some(IconOrientation::Closed) => self.icon_closed.as_str(),
                None => blank_icon.as_str(),
            };
            out.push_str(icon);
            out.push(' ');
            out.push_str(text);

            if decorations.ellipsis {
                out.push(' ');
                out.push_str(&self.ellipsis);
            }
            out.push('\n');
        }
        out
    }
}

impl LineSurface for TextSurface {
    type Icon = usize;

    fn count(&self) -> usize {
        self.lines.len()
    }

    fn text(&self, line: usize) -> &str {
        &self.lines[line]
    }

    fn set_hidden(&mut self, line: usize, hidden: bool) {
        self.decorations[line].hidden = hidden;
    }

    fn attached_count(&self, line: usize) -> u32 {
        self.decorations[line].attached_count
    }

    fn set_attached_count(&mut self, line: usize, count: u32) {
        self.decorations[line].attached_count = count;
    }

    fn attach_ellipsis(&mut self, line: usize) {
        self.decorations[line].ellipsis = true;
    }

    fn detach_ellipsis(&mut self, line: usize) {
        self.decorations[line].ellipsis = false;
    }

    fn attach_fold_icon(&mut self, line: usize) -> usize {
        self.decorations[line].icon = Some(IconOrientation::Open);
        line
    }

    fn orient_icon(&mut self, icon: &mut usize, orientation: IconOrientation) {
        self.decorations[*icon].icon = Some(orientation);
    }

    fn clear_decorations(&mut self) {
        self.decorations.fill(Decorations::default());
    }
}
