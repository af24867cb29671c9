use ansi_term::{Colour, Style};

const fn style(foreground: Option<Colour>, is_bold: bool) -> Style {
    Style {
        foreground,
        background: None,
        is_bold,
        is_dimmed: false,
        is_italic: false,
        is_underline: false,
        is_blink: false,
        is_reverse: false,
        is_hidden: false,
        is_strikethrough: false,
    }
}

pub const GRAY: Style = style(Some(Colour::Fixed(8)), false);
pub const GRN: Style = style(Some(Colour::Green), false);
pub const RED: Style = style(Some(Colour::Red), false);
pub const BOLD: Style = style(None, true);

/// Words that differ between two memory images, as (address, left, right).
pub fn mem_changes(left: &[i32], right: &[i32]) -> Vec<(usize, i32, i32)> {
    left.iter()
        .zip(right)
        .enumerate()
        .filter(|(_, (l, r))| l != r)
        .map(|(addr, (&l, &r))| (addr, l, r))
        .collect()
}

/// Print the words that differ between two memory images to stderr.
pub fn mem_diff(left: &[i32], right: &[i32], color: bool) {
    let changes = mem_changes(left, right);
    if changes.is_empty() {
        eprintln!("data memory unchanged");
        return;
    }
    let paint = |style: Style, s: String| {
        if color {
            style.paint(s).to_string()
        } else {
            s
        }
    };
    eprintln!("{}", paint(BOLD, format!("{} words changed:", changes.len())));
    for (addr, l, r) in changes {
        eprintln!(
            "{}: {} -> {}",
            paint(GRAY, format!("dataMem[ {addr} ]")),
            paint(RED, l.to_string()),
            paint(GRN, r.to_string())
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mem_changes() {
        assert_eq!(mem_changes(&[1, 2, 3], &[1, 5, 3]), vec![(1, 2, 5)]);
        assert!(mem_changes(&[0; 4], &[0; 4]).is_empty());
    }
}
