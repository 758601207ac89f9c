// Human-readable byte counts and percentages for the stats table

const UNIT: u64 = 1024;
const PREFIXES: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];

/// Scale a byte count to the largest power of 1024 not exceeding it.
///
/// Values below 1 KiB print as a bare integer (`"1023 B"`); everything else
/// gets one decimal place and a binary prefix (`"1.0 KB"`, `"1.5 GB"`).
pub fn format_bytes(bytes: u64) -> String {
    if bytes < UNIT {
        return format!("{} B", bytes);
    }
    let (div, exp) = scale(bytes);
    format!("{:.1} {}B", bytes as f64 / div as f64, PREFIXES[exp])
}

/// Index into `["", K, M, G, T, P, E]` chosen by [`format_bytes`].
pub fn unit_rank(bytes: u64) -> usize {
    if bytes < UNIT { 0 } else { scale(bytes).1 + 1 }
}

fn scale(bytes: u64) -> (u64, usize) {
    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }
    (div, exp)
}

/// Two decimal places with a trailing `%`.
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}
