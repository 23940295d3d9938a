//! The twelve philosophers and their time phrases.
//!
//! Each hour slot on the dial belongs to one philosopher; the slot for
//! 12 o'clock also covers hour 0, so all 24 hours resolve to a label.

/// Hour slots 1 through 12, in dial order.
pub const PHILOSOPHERS: [&str; 12] = [
    "Leibniz",
    "Kant",
    "Hegel",
    "Fichte",
    "Schopenhauer",
    "Nietzsche",
    "Marx",
    "Engels",
    "Herder",
    "Lessing",
    "Heidegger",
    "Habermas",
];

const FALLBACK_TEMPLATE: &str = "It's {h}:{m}:{s}.";

fn template_for(label: &str) -> &'static str {
    match label {
        "Leibniz" => "Ah, the best of all possible times: {h} hours, {m} minutes and {s} seconds.",
        "Kant" => "By duty I declare: it is {h} hours, {m} minutes and {s} seconds.",
        "Hegel" => "The time is (in dialectical motion) {h}:{m}:{s}.",
        "Fichte" => "Consciousness proclaims: {h} hours, {m} minutes, {s} seconds.",
        "Schopenhauer" => "Time, the will's annoying companion: {h}h {m}m {s}s.",
        "Nietzsche" => "Behold the hour: {h} hours, {m} minutes, {s} seconds. Become who you are.",
        "Marx" => "Workers of the world note the time: {h}:{m}:{s}.",
        "Engels" => "Material conditions indicate: {h} hours {m} minutes {s} seconds.",
        "Herder" => "Time tells culture: it's {h} hours and {m} minutes, {s} seconds.",
        "Lessing" => "In the theatre of life, the clock says {h}:{m}:{s}.",
        "Heidegger" => "Time is (being): {h} hours, {m} minutes, {s} seconds.",
        "Habermas" => "Communicative act: the time is {h}:{m}:{s}.",
        _ => FALLBACK_TEMPLATE,
    }
}

/// Map a 24-hour hour to its philosopher. Hours 0 and 12 both sit at the
/// top of the dial and share the twelfth label.
pub fn label_for(hour: u32) -> &'static str {
    let idx = (hour as usize % 12 + 11) % 12;
    PHILOSOPHERS[idx]
}

/// Build the spoken line for a time. Pure: same inputs, same string.
/// Hours stay unpadded; minutes and seconds are zero padded for nicer speech.
pub fn format_phrase(hour: u32, minute: u32, second: u32) -> String {
    let label = label_for(hour);
    let line = template_for(label)
        .replace("{h}", &hour.to_string())
        .replace("{m}", &format!("{minute:02}"))
        .replace("{s}", &format!("{second:02}"));
    format!("{label} says: {line}")
}
