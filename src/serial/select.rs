use crate::serial::PortCandidate;

/// Keyword groups and the weight each group adds when any of its keywords
/// appears in a candidate's device, description or manufacturer.
const SCORE_TABLE: &[(&[&str], u32)] = &[
    (&["beca"], 10),
    (&["usb"], 4),
    (&["serial"], 4),
    (&["cp210", "ch340", "ftdi", "uart"], 3),
];

pub fn score_candidate(candidate: &PortCandidate) -> u32 {
    let haystack = format!(
        "{} {} {}",
        candidate.device,
        candidate.description,
        candidate.manufacturer.as_deref().unwrap_or("")
    )
    .to_lowercase();

    SCORE_TABLE
        .iter()
        .filter(|(keywords, _)| keywords.iter().any(|k| haystack.contains(k)))
        .map(|(_, weight)| weight)
        .sum()
}

/// Picks the most likely instrument port.
///
/// Highest score wins and ties go to the earliest candidate. When nothing
/// scores, the first candidate is used. `None` only for an empty list.
pub fn auto_pick(candidates: &[PortCandidate]) -> Option<&PortCandidate> {
    let mut best: Option<(&PortCandidate, u32)> = None;
    for candidate in candidates {
        let score = score_candidate(candidate);
        match best {
            Some((_, best_score)) if best_score >= score => {}
            _ => best = Some((candidate, score)),
        }
    }

    match best {
        Some((candidate, score)) if score > 0 => Some(candidate),
        _ => candidates.first(),
    }
}
