use super::FrameSize;

/// A wrapped caption line and where its line box starts.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub x: f32,
    pub top: f32,
}

/// Greedy word wrap.
///
/// Words are added to the current line while its measured width stays within
/// `max_width`. A single word wider than `max_width` still gets its own line.
pub fn wrap_lines<F>(text: &str, max_width: f32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let candidate = format!("{current} {word}");
        if measure(&candidate) > max_width {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Wrap `text` and center the block in `frame`.
///
/// The block is centered vertically using `line_height` per line and every
/// line is centered horizontally on its own. Blocks taller than the frame get
/// a negative top and overflow on both edges.
pub fn layout_block<F>(
    text: &str,
    frame: FrameSize,
    horizontal_margin: u32,
    line_height: f32,
    measure: F,
) -> Vec<PlacedLine>
where
    F: Fn(&str) -> f32,
{
    let max_width = frame.width.saturating_sub(horizontal_margin) as f32;
    let lines = wrap_lines(text, max_width, &measure);

    let total_height = lines.len() as f32 * line_height;
    let block_top = ((frame.height as f32 - total_height) / 2.0).floor();

    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let width = measure(&line);
            PlacedLine {
                x: center_offset(frame.width, width),
                top: block_top + i as f32 * line_height,
                text: line,
            }
        })
        .collect()
}

/// Left offset that centers `width` inside `extent`.
pub fn center_offset(extent: u32, width: f32) -> f32 {
    ((extent as f32 - width) / 2.0).floor()
}
