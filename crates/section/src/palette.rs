/// Fill colors for strata that do not carry their own; cycles past the end.
pub const STRATUM_COLORS: [&str; 10] = [
    "#efa59c", "#77e1ca", "#cdacfc", "#f2c6a7", "#7edff4", "#f2a8c3", "#cde9ba", "#f2c1fa",
    "#f1dba3", "#a3acf7",
];

pub const WATER_COLOR: &str = "blue";

pub fn stratum_color(index: usize) -> &'static str {
    STRATUM_COLORS[index % STRATUM_COLORS.len()]
}
