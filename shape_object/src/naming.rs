//! Column naming convention

/// Convert a member name to its conventional column name.
///
/// Surrounding whitespace is trimmed, an underscore is inserted before every
/// uppercase ASCII letter that is not the first character, and the result is
/// lowercased: `"VisualStudio"` becomes `"visual_studio"`.
pub fn to_snake_case(input: &str) -> String {
    let trimmed = input.trim();
    let mut result = String::with_capacity(trimmed.len() + 4);

    for (i, ch) in trimmed.chars().enumerate() {
        if i > 0 && ch.is_ascii_uppercase() {
            result.push('_');
        }
        result.extend(ch.to_lowercase());
    }

    result
}
