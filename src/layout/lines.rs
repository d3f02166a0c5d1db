//! Regroups a section's fragments into reading-order lines.

use super::Annotation;

/// Groups fragments into lines, top to bottom, each line left to right.
///
/// Fragments are swept in order of their top edge. A new line starts whenever
/// the previous fragment ends (bottom edge) strictly above where the current
/// one begins; fragments whose vertical extents touch stay on one line.
/// Fragments without any alphanumeric character are OCR noise and skipped.
pub fn group_into_lines(annotations: &[&Annotation]) -> Vec<Vec<String>> {
    let mut sorted: Vec<&Annotation> = annotations
        .iter()
        .copied()
        .filter(|a| a.text.chars().any(char::is_alphanumeric))
        .collect();

    // Full ordering so the result does not depend on input order
    sorted.sort_by(|a, b| {
        let (ra, rb) = (&a.rectangle, &b.rectangle);
        (ra.top_left.y, ra.top_left.x, ra.bottom_left.y, &a.text).cmp(&(
            rb.top_left.y,
            rb.top_left.x,
            rb.bottom_left.y,
            &b.text,
        ))
    });

    let mut lines = Vec::new();
    let mut current: Vec<&Annotation> = Vec::new();

    for annotation in sorted {
        if let Some(previous) = current.last() {
            if previous.rectangle.bottom_left.y < annotation.rectangle.top_left.y {
                lines.push(finish_line(std::mem::take(&mut current)));
            }
        }
        current.push(annotation);
    }

    if !current.is_empty() {
        lines.push(finish_line(current));
    }

    lines
}

fn finish_line(mut line: Vec<&Annotation>) -> Vec<String> {
    line.sort_by_key(|a| a.rectangle.top_left.x);
    line.into_iter().map(|a| a.text.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::geometry::Rectangle;

    fn word(text: &str, x: i32, y: i32, height: i32) -> Annotation {
        Annotation::new(text, Rectangle::from_origin(x, y, 30, height))
    }

    fn group(annotations: &[Annotation]) -> Vec<Vec<String>> {
        let refs: Vec<&Annotation> = annotations.iter().collect();
        group_into_lines(&refs)
    }

    fn sample() -> Vec<Annotation> {
        vec![
            word("Queue", 10, 100, 20),
            word("Players", 60, 41, 18),
            word("Current", 10, 40, 20),
            word("bo", 60, 72, 20),
            word("ann", 10, 70, 20),
            word("5", 10, 10, 20),
            word("Left", 40, 12, 20),
        ]
    }

    #[test]
    fn test_group_into_lines() {
        assert_eq!(
            group(&sample()),
            vec![
                vec!["5", "Left"],
                vec!["Current", "Players"],
                vec!["ann", "bo"],
                vec!["Queue"],
            ]
        );
    }

    #[test]
    fn test_group_into_lines_skips_punctuation() {
        let annotations = vec![
            word("1.", 10, 10, 20),
            word("-", 40, 10, 20),
            word(":", 70, 10, 20),
            word("...", 10, 50, 20),
        ];
        assert_eq!(group(&annotations), vec![vec!["1."]]);
    }

    #[test]
    fn test_touching_boxes_share_a_line() {
        // Bottom of "a" is exactly the top of "b": no gap, same line
        let annotations = vec![word("a", 10, 10, 20), word("b", 50, 30, 20)];
        assert_eq!(group(&annotations), vec![vec!["a", "b"]]);

        let annotations = vec![word("a", 10, 10, 20), word("b", 50, 31, 20)];
        assert_eq!(group(&annotations), vec![vec!["a"], vec!["b"]]);
    }

    #[test]
    fn test_group_into_lines_is_order_independent() {
        let forward = sample();
        let expected = group(&forward);

        let mut reversed = forward.clone();
        reversed.reverse();
        assert_eq!(group(&reversed), expected);

        let mut rotated = forward.clone();
        rotated.rotate_left(3);
        assert_eq!(group(&rotated), expected);
    }

    #[test]
    fn test_group_into_lines_is_idempotent() {
        let annotations = sample();
        assert_eq!(group(&annotations), group(&annotations));
    }

    #[test]
    fn test_group_into_lines_empty() {
        assert!(group(&[]).is_empty());
    }
}
