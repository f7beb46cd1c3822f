use crate::{
    board::{CellType, Field},
    state::{DuelState, PlayerState},
};

#[derive(Clone, Debug, PartialEq)]
pub enum TermCell {
    FieldCell(CellType),
    // Row being cleared, shown in the "lit" phase of the flash
    Flash,
    BorderVertical,
    BorderHorizontal,
    BorderTopLeft,
    BorderTopRight,
    BorderBottomLeft,
    BorderBottomRight,
    Space,
    Message(String),
}

pub trait TermStyle {
    fn display<'a>(&self, cell: &'a TermCell) -> &'a str;
    fn width(&self, cell: &TermCell) -> usize;
}

pub trait TermRender {
    fn output(&self, style: &impl TermStyle) -> Vec<Vec<TermCell>>;
    fn render(&self, style: &impl TermStyle) -> Vec<String> {
        self.output(style)
            .iter()
            .map(|row| row.iter().map(|cell| style.display(cell)).collect())
            .collect()
    }
}

fn block_width(block: &[Vec<TermCell>], style: &impl TermStyle) -> usize {
    block
        .iter()
        .map(|row| row.iter().map(|c| style.width(c)).sum::<usize>())
        .max()
        .unwrap_or(0)
}

// Make all lines in block the same width by padding with TermCell::Space
pub fn pad_block_right(block: &mut [Vec<TermCell>], style: &impl TermStyle) {
    // Requires that the width of TermCell::Space display is 1
    assert_eq!(style.width(&TermCell::Space), 1);
    let width = block_width(block, style);
    for row in block.iter_mut() {
        let line_width: usize = row.iter().map(|c| style.width(c)).sum();
        row.extend(std::iter::repeat_n(TermCell::Space, width - line_width));
    }
}

/// Place blocks side by side, top-aligned, separated by `gap` spaces
pub fn join_blocks(
    mut blocks: Vec<Vec<Vec<TermCell>>>,
    gap: usize,
    style: &impl TermStyle,
) -> Vec<Vec<TermCell>> {
    let height = blocks.iter().map(|b| b.len()).max().unwrap_or(0);
    for block in &mut blocks {
        let width = block_width(block, style);
        block.resize_with(height, || vec![TermCell::Space; width]);
        pad_block_right(block, style);
    }
    (0..height)
        .map(|i| {
            let mut line = Vec::new();
            for (n, block) in blocks.iter().enumerate() {
                if n > 0 {
                    line.extend(std::iter::repeat_n(TermCell::Space, gap));
                }
                line.extend(block[i].iter().cloned());
            }
            line
        })
        .collect()
}

fn horizontal_border(cols: usize, left: TermCell, right: TermCell) -> Vec<TermCell> {
    let mut line = vec![left];
    line.extend(std::iter::repeat_n(TermCell::BorderHorizontal, cols));
    line.push(right);
    line
}

pub struct PlainTermStyle;

impl TermStyle for PlainTermStyle {
    fn display<'a>(&self, cell: &'a TermCell) -> &'a str {
        match cell {
            TermCell::FieldCell(CellType::Empty) => "  ",
            TermCell::FieldCell(_) => "[]",
            TermCell::Flash => "**",
            TermCell::BorderVertical => "|",
            TermCell::BorderTopLeft => "+",
            TermCell::BorderTopRight => "+",
            TermCell::BorderBottomLeft => "+",
            TermCell::BorderHorizontal => "--",
            TermCell::BorderBottomRight => "+",
            TermCell::Space => " ",
            TermCell::Message(s) => s.as_str(),
        }
    }
    fn width(&self, cell: &TermCell) -> usize {
        cell_width(cell)
    }
}

pub struct AnsiTermStyle;

impl TermStyle for AnsiTermStyle {
    fn display<'a>(&self, cell: &'a TermCell) -> &'a str {
        // Closest 8-color match to each piece color
        match cell {
            TermCell::FieldCell(CellType::Empty) => "\x1b[0m  ",
            TermCell::FieldCell(CellType::I) => "\x1b[0;36m[]",
            TermCell::FieldCell(CellType::J) => "\x1b[0;34m[]",
            TermCell::FieldCell(CellType::L) => "\x1b[0;37m[]",
            TermCell::FieldCell(CellType::O) => "\x1b[0;33m[]",
            TermCell::FieldCell(CellType::S) => "\x1b[0;32m[]",
            TermCell::FieldCell(CellType::T) => "\x1b[0;35m[]",
            TermCell::FieldCell(CellType::Z) => "\x1b[0;31m[]",
            TermCell::Flash => "\x1b[1;37m##",
            TermCell::BorderVertical => "\x1b[0m│",
            TermCell::BorderTopLeft => "\x1b[0m┌",
            TermCell::BorderTopRight => "\x1b[0m┐",
            TermCell::BorderBottomLeft => "\x1b[0m└",
            TermCell::BorderHorizontal => "\x1b[0m──",
            TermCell::BorderBottomRight => "\x1b[0m┘",
            TermCell::Space => "\x1b[0m ",
            TermCell::Message(s) => s.as_str(),
        }
    }
    fn width(&self, cell: &TermCell) -> usize {
        cell_width(cell)
    }
}

fn cell_width(cell: &TermCell) -> usize {
    match cell {
        TermCell::FieldCell(_) | TermCell::Flash | TermCell::BorderHorizontal => 2,
        TermCell::BorderVertical
        | TermCell::BorderTopLeft
        | TermCell::BorderTopRight
        | TermCell::BorderBottomLeft
        | TermCell::BorderBottomRight
        | TermCell::Space => 1,
        TermCell::Message(s) => s.chars().count(),
    }
}

impl TermRender for Field {
    fn output(&self, _style: &impl TermStyle) -> Vec<Vec<TermCell>> {
        (0..self.rows())
            .map(|row| {
                (0..self.cols())
                    .map(|col| TermCell::FieldCell(self.get_cell(col, row)))
                    .collect()
            })
            .collect()
    }
}

/// A player's well with its border and overlays
pub struct WellField {
    field: Field,
    lost: bool,
    clearing_rows: Vec<usize>,
    flash_on: bool,
}

impl WellField {
    pub fn new(field: Field, lost: bool) -> Self {
        Self {
            field,
            lost,
            clearing_rows: Vec::new(),
            flash_on: false,
        }
    }

    /// Rows being cleared alternate between `Flash` and their cells
    pub fn with_clearing(mut self, rows: Vec<usize>, flash_on: bool) -> Self {
        self.clearing_rows = rows;
        self.flash_on = flash_on;
        self
    }
}

impl TermRender for WellField {
    fn output(&self, style: &impl TermStyle) -> Vec<Vec<TermCell>> {
        let mut lines = self.field.output(style);
        if self.flash_on {
            for &row in &self.clearing_rows {
                if let Some(line) = lines.get_mut(row) {
                    line.fill(TermCell::Flash);
                }
            }
        }
        if self.lost {
            let middle = lines.len() / 2;
            let width = self.field.cols() * style.width(&TermCell::FieldCell(CellType::Empty));
            let text = "Game Over";
            let indent = width.saturating_sub(text.len()) / 2;
            lines[middle] = vec![TermCell::Message(format!("{}{}", " ".repeat(indent), text))];
            pad_block_right(&mut lines, style);
        }

        for line in &mut lines {
            line.insert(0, TermCell::BorderVertical);
            line.push(TermCell::BorderVertical);
        }
        lines.push(horizontal_border(
            self.field.cols(),
            TermCell::BorderBottomLeft,
            TermCell::BorderBottomRight,
        ));
        lines
    }
}

pub struct PreviewField(pub Field);

impl TermRender for PreviewField {
    fn output(&self, style: &impl TermStyle) -> Vec<Vec<TermCell>> {
        let mut lines = self.0.output(style);
        for line in &mut lines {
            line.insert(0, TermCell::BorderVertical);
            line.push(TermCell::BorderVertical);
        }
        lines.insert(
            0,
            horizontal_border(self.0.cols(), TermCell::BorderTopLeft, TermCell::BorderTopRight),
        );
        lines.push(horizontal_border(
            self.0.cols(),
            TermCell::BorderBottomLeft,
            TermCell::BorderBottomRight,
        ));
        lines
    }
}

/// Name, score and next piece of one player
struct PlayerPanel<'a> {
    label: &'a str,
    state: &'a PlayerState,
}

impl TermRender for PlayerPanel<'_> {
    fn output(&self, style: &impl TermStyle) -> Vec<Vec<TermCell>> {
        let mut lines = vec![
            vec![TermCell::Message(format!("{} {}", self.label, self.state.name))],
            vec![TermCell::Message(format!("Score: {}", self.state.score))],
            vec![TermCell::Message("Next:".to_string())],
        ];
        lines.extend(PreviewField(self.state.preview.clone()).output(style));
        lines
    }
}

/// Both wells with the player panels and messages between them
pub struct DuelView {
    state: DuelState,
    message: Vec<String>,
    flash_on: bool,
}

impl DuelView {
    pub fn new(state: DuelState, message: Vec<String>) -> Self {
        Self {
            state,
            message,
            flash_on: false,
        }
    }

    /// Phase of the clear flash for this frame
    pub fn with_flash(mut self, flash_on: bool) -> Self {
        self.flash_on = flash_on;
        self
    }

    fn well(&self, player: &PlayerState) -> WellField {
        WellField::new(player.well.clone(), player.lost)
            .with_clearing(player.clearing_rows.clone(), self.flash_on)
    }
}

impl TermRender for DuelView {
    fn output(&self, style: &impl TermStyle) -> Vec<Vec<TermCell>> {
        let mut middle = PlayerPanel {
            label: "P1",
            state: &self.state.player_one,
        }
        .output(style);
        middle.push(Vec::new());
        middle.extend(
            PlayerPanel {
                label: "P2",
                state: &self.state.player_two,
            }
            .output(style),
        );
        middle.push(Vec::new());
        for message in &self.message {
            middle.push(vec![TermCell::Message(message.clone())]);
        }

        join_blocks(
            vec![
                self.well(&self.state.player_one).output(style),
                middle,
                self.well(&self.state.player_two).output(style),
            ],
            2,
            style,
        )
    }
}
