/// Replace `$` with the fullwidth dollar sign (U+FF04) so rendered
/// captions never treat a pair of fares as a math span.
pub fn fullwidth_dollar(text: &str) -> String {
    text.replace('$', "\u{FF04}")
}
