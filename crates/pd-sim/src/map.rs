//! ASCII rendering of the section grid
//!
//! North is up. Each section is one character; the characters between
//! sections show how they connect.

use pd_core::{Connection, Direction, GridCoord, LevelState, Section, SectionKind};

fn cell_glyph(section: &Section) -> char {
    match section.kind {
        SectionKind::Spawn if section.generated => 'S',
        SectionKind::Exit => 'E',
        _ if section.instantiated => '#',
        _ if section.generated => '?',
        _ => '.',
    }
}

fn link_glyph(section: &Section, dir: Direction) -> char {
    if !section.generated {
        return ' ';
    }
    match (section.connections[dir], dir.is_horizontal()) {
        (Connection::Door, _) => '+',
        (Connection::Open, true) => '-',
        (Connection::Open, false) => '|',
        _ => ' ',
    }
}

/// One string per map row, top row first
pub fn render_rows(state: &LevelState) -> Vec<String> {
    let line = state.grid.line() as i32;
    let mut rows = Vec::new();

    for y in (0..line).rev() {
        let mut cells = String::new();
        let mut links = String::new();
        for x in 0..line {
            let Ok(section) = state.section_at(GridCoord::new(x, y)) else {
                continue;
            };
            cells.push(cell_glyph(section));
            if x + 1 < line {
                cells.push(link_glyph(section, Direction::East));
            }
            links.push(link_glyph(section, Direction::South));
            links.push(' ');
        }
        rows.push(cells);
        if y > 0 {
            rows.push(links.trim_end().to_string());
        }
    }
    rows
}
