//! Save and restore node origins and panning as an ini-style text block.
//!
//! ```text
//! [editor]
//! panning=12,-40
//!
//! [node.1]
//! origin=100,100
//! ```
//!
//! Only layout survives a save; selection and the graph itself belong to the
//! host.

use crate::context::EditorContext;
use crate::error::{EditorError, EditorResult};
use crate::math::Vec2;
use std::fmt::Write as _;
use std::path::Path;

enum Section {
    None,
    Editor,
    Node(i32),
    Unknown,
}

fn malformed(line: usize, content: &str) -> EditorError {
    let err = EditorError::MalformedIni {
        line,
        content: content.to_string(),
    };
    log::error!("{}", err);
    err
}

fn parse_pair(value: &str) -> Option<Vec2> {
    let (x, y) = value.split_once(',')?;
    let x = x.trim().parse::<f32>().ok()?;
    let y = y.trim().parse::<f32>().ok()?;
    if x.is_finite() && y.is_finite() {
        Some(Vec2::new(x, y))
    } else {
        None
    }
}

impl EditorContext {
    /// Serialize panning and every known node origin, nodes sorted by id.
    pub fn save_state_to_ini_string(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "[editor]\npanning={},{}",
            self.panning.x as i32,
            self.panning.y as i32
        );

        let mut ids: Vec<i32> = self.origins_by_id.keys().copied().collect();
        ids.sort_unstable();
        for id in ids {
            if let Some(origin) = self.origins_by_id.get(&id) {
                let _ = writeln!(
                    out,
                    "\n[node.{}]\norigin={},{}",
                    id,
                    origin.x as i32,
                    origin.y as i32
                );
            }
        }
        out
    }

    /// Restore state written by [`save_state_to_ini_string`](Self::save_state_to_ini_string).
    ///
    /// Origins for ids that were never submitted are kept and used when the
    /// node first appears. Unknown sections and keys are skipped with a
    /// warning; a line that is neither a section, a key-value pair nor blank
    /// is an error and leaves the context untouched.
    pub fn load_state_from_ini_string(&mut self, ini: &str) -> EditorResult<()> {
        let mut panning = None;
        let mut origins = Vec::new();
        let mut section = Section::None;

        for (index, raw) in ini.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }

            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                section = if name == "editor" {
                    Section::Editor
                } else if let Some(id) = name.strip_prefix("node.") {
                    let id = id.parse::<i32>().map_err(|_| malformed(line_no, raw))?;
                    Section::Node(id)
                } else {
                    log::warn!("ignoring unknown ini section [{}]", name);
                    Section::Unknown
                };
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(malformed(line_no, raw));
            };
            match (&section, key.trim()) {
                (Section::Editor, "panning") => {
                    panning = Some(parse_pair(value).ok_or_else(|| malformed(line_no, raw))?);
                }
                (Section::Node(id), "origin") => {
                    let origin = parse_pair(value).ok_or_else(|| malformed(line_no, raw))?;
                    origins.push((*id, origin));
                }
                (Section::Unknown, _) => {}
                (_, key) => log::warn!("ignoring ini key '{}' on line {}", key, line_no),
            }
        }

        if let Some(panning) = panning {
            self.panning = panning;
        }
        let count = origins.len();
        for (id, origin) in origins {
            self.set_node_grid_space_pos(id, origin);
        }
        log::debug!("loaded editor state with {} node origins", count);
        Ok(())
    }

    pub fn save_state_to_ini_file(&self, path: impl AsRef<Path>) -> EditorResult<()> {
        std::fs::write(path, self.save_state_to_ini_string())?;
        Ok(())
    }

    pub fn load_state_from_ini_file(&mut self, path: impl AsRef<Path>) -> EditorResult<()> {
        let ini = std::fs::read_to_string(path)?;
        self.load_state_from_ini_string(&ini)
    }
}
