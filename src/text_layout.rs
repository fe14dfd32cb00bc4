use crate::{font::Typeface, primitives::FontWeight};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub weight: FontWeight,
}

#[derive(Debug, Clone)]
struct Chunk<'a> {
    text: &'a str,
    width: f32,
    is_whitespace: bool,
}

/// Greedily breaks `text` into lines no wider than `target_width`.
///
/// Explicit newlines start a new line. A word wider than the target is split
/// between characters so no line ever overflows unless a single character does.
pub fn wrap_text(
    typeface: &dyn Typeface,
    style: TextStyle,
    text: &str,
    target_width: f32,
) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let chunks = chunk_paragraph(typeface, style, paragraph);
        wrap_chunks(typeface, style, &chunks, target_width, &mut lines);
    }
    lines
}

fn wrap_chunks(
    typeface: &dyn Typeface,
    style: TextStyle,
    chunks: &[Chunk],
    target_width: f32,
    lines: &mut Vec<String>,
) {
    let mut line = String::new();
    let mut x = 0.0;
    let mut pending_space: Option<&Chunk> = None;

    for chunk in chunks {
        if chunk.is_whitespace {
            if !line.is_empty() {
                pending_space = Some(chunk);
            }
            continue;
        }

        let space_width = pending_space.map_or(0.0, |space| space.width);
        if !line.is_empty() && x + space_width + chunk.width > target_width {
            lines.push(std::mem::take(&mut line));
            x = 0.0;
            pending_space = None;
        }

        if let Some(space) = pending_space.take() {
            line.push_str(space.text);
            x += space.width;
        }

        if chunk.width > target_width {
            // Break an oversized word between characters.
            for c in chunk.text.chars() {
                let width = typeface.text_width(c.encode_utf8(&mut [0; 4]), style.size, style.weight);
                if !line.is_empty() && x + width > target_width {
                    lines.push(std::mem::take(&mut line));
                    x = 0.0;
                }
                line.push(c);
                x += width;
            }
        } else {
            line.push_str(chunk.text);
            x += chunk.width;
        }
    }

    lines.push(line);
}

fn chunk_paragraph<'a>(typeface: &dyn Typeface, style: TextStyle, text: &'a str) -> Vec<Chunk<'a>> {
    let mut chunks = Vec::new();
    let mut current_chunk_start = 0;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if current_chunk_start < i {
                chunks.push(measure(typeface, style, &text[current_chunk_start..i], false));
            }
            let next_i = i + c.len_utf8();
            chunks.push(measure(typeface, style, " ", true));
            current_chunk_start = next_i;
        }
    }

    if current_chunk_start < text.len() {
        chunks.push(measure(typeface, style, &text[current_chunk_start..], false));
    }

    chunks
}

fn measure<'a>(typeface: &dyn Typeface, style: TextStyle, text: &'a str, is_whitespace: bool) -> Chunk<'a> {
    Chunk {
        text,
        width: typeface.text_width(text, style.size, style.weight),
        is_whitespace,
    }
}
