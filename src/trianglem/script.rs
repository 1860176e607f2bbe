//! Script tokenization (.tat script text: scenes, speakers, dialogue)

use log::{debug, warn};

use super::models::{DialogueUnit, LineKind, Scene};

/// Two-character prefix marking a comment line.
const COMMENT_MARKER: &str = "//";

/// Full-width curly braces delimiting a speaker-marker line (U+FF5B/U+FF5D).
const SPEAKER_OPEN: char = '｛';
const SPEAKER_CLOSE: char = '｝';

/// Full-width corner quotes delimiting dialogue text (U+300C/U+300D).
const QUOTE_OPEN: char = '「';
const QUOTE_CLOSE: char = '」';

/// Classify one script line by its delimiters.
///
/// Dispatches to exactly one kind before any content extraction happens, so
/// extraction never has to guess at a half-matched line. A delimiter that
/// opens without closing (or closes without opening) is `Malformed`.
pub fn classify_line(line: &str) -> LineKind {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if trimmed.starts_with(COMMENT_MARKER) {
        return LineKind::Comment;
    }
    if is_scene_header(trimmed) {
        return LineKind::SceneHeader;
    }
    if trimmed.starts_with(SPEAKER_OPEN) {
        return if trimmed.ends_with(SPEAKER_CLOSE) {
            LineKind::SpeakerMarker
        } else {
            LineKind::Malformed
        };
    }
    match (trimmed.find(QUOTE_OPEN), trimmed.find(QUOTE_CLOSE)) {
        (Some(open), Some(close)) if close > open => LineKind::Dialogue,
        (None, None) => LineKind::Other,
        _ => LineKind::Malformed,
    }
}

/// A header line's entire trimmed content is a single `[...]` pair.
fn is_scene_header(trimmed: &str) -> bool {
    match trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        Some(inner) => !inner.contains('[') && !inner.contains(']'),
        None => false,
    }
}

/// Split decoded script text into scenes.
///
/// Each header line opens a scene named by the bracket-stripped header text;
/// the scene's span runs to the next header or the end of input. Lines ahead
/// of the first header belong to no scene and are discarded.
pub fn split_scenes(text: &str) -> Vec<Scene> {
    let mut scenes: Vec<Scene> = Vec::new();
    let mut preamble = 0usize;

    for (idx, raw) in text.split('\n').enumerate() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if classify_line(line) == LineKind::SceneHeader {
            let trimmed = line.trim();
            scenes.push(Scene {
                name: trimmed[1..trimmed.len() - 1].to_string(),
                first_line: idx + 2,
                lines: Vec::new(),
            });
        } else if let Some(scene) = scenes.last_mut() {
            scene.lines.push(line.to_string());
        } else {
            preamble += 1;
        }
    }

    if preamble > 0 {
        debug!(
            "Discarded {} preamble line(s) ahead of the first scene header",
            preamble
        );
    }
    debug!("Split script into {} scene(s)", scenes.len());
    scenes
}

/// Extract the dialogue units of one scene.
///
/// Returns a lazy, finite iterator; calling again restarts the scan from the
/// top of the scene.
pub fn extract_dialogue<'a>(scene: &'a Scene, source_file: &'a str) -> DialogueLines<'a> {
    DialogueLines {
        scene,
        source_file,
        cursor: 0,
        speaker: None,
        context: None,
    }
}

/// Iterator yielding the dialogue units of one scene in line order.
///
/// A single forward pass with O(1) state: the current-speaker slot (plus the
/// verbatim marker line kept as pending context) starts empty at scene entry
/// and persists until the next marker or the end of the scene. Marker lines
/// produce no unit themselves; each dialogue line produces exactly one.
pub struct DialogueLines<'a> {
    scene: &'a Scene,
    source_file: &'a str,
    cursor: usize,
    speaker: Option<String>,
    context: Option<String>,
}

impl<'a> DialogueLines<'a> {
    fn emit(&self, line: &str, line_number: usize) -> Option<DialogueUnit> {
        let open = line.find(QUOTE_OPEN)?;
        let close = line[open..].find(QUOTE_CLOSE).map(|i| open + i)?;
        let text = line[open + QUOTE_OPEN.len_utf8()..close].trim().to_string();

        Some(DialogueUnit {
            source_file: self.source_file.to_string(),
            line_number,
            scene: self.scene.name.clone(),
            speaker: self.speaker.clone(),
            text,
            full_line: line.to_string(),
            context: self.context.clone().unwrap_or_default(),
        })
    }
}

impl<'a> Iterator for DialogueLines<'a> {
    type Item = DialogueUnit;

    fn next(&mut self) -> Option<DialogueUnit> {
        while self.cursor < self.scene.lines.len() {
            let line = &self.scene.lines[self.cursor];
            let line_number = self.scene.first_line + self.cursor;
            self.cursor += 1;

            match classify_line(line) {
                LineKind::SpeakerMarker => {
                    let trimmed = line.trim();
                    self.speaker = Some(
                        trimmed
                            .trim_start_matches(SPEAKER_OPEN)
                            .trim_end_matches(SPEAKER_CLOSE)
                            .to_string(),
                    );
                    self.context = Some(trimmed.to_string());
                }
                LineKind::Dialogue => {
                    if let Some(unit) = self.emit(line, line_number) {
                        return Some(unit);
                    }
                }
                LineKind::Malformed => {
                    warn!("Skipping malformed line {}: {:?}", line_number, line);
                }
                LineKind::Blank | LineKind::Comment | LineKind::SceneHeader | LineKind::Other => {}
            }
        }
        None
    }
}
