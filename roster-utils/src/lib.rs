/// Level and experience-threshold math.
pub mod leveling;
/// Pure parser helpers.
pub mod parse;
/// Shared calendar helpers.
pub mod time;
