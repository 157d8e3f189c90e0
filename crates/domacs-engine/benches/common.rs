// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
#[allow(dead_code)]
pub fn generate_fragmented_markup(paragraphs: usize) -> String {
    let base = "<p>Paragraph with <b>bold</b>, <i>ital<b>ic</b></i> and <code>co</code>de fragments.</p>";
    base.repeat(paragraphs)
}

/// A document whose only match sits at the very end, split across leaves.
#[allow(dead_code)]
pub fn generate_with_needle_at_end(paragraphs: usize) -> String {
    let mut markup = generate_fragmented_markup(paragraphs);
    markup.push_str("<p>nee<b>dle</b></p>");
    markup
}
