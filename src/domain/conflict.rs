use crate::domain::models::TimeBox;
use crate::domain::time::{FormatError, time_to_minutes};

/// Half-open interval overlap: `[s1, e1)` and `[s2, e2)` overlap iff
/// `s1 < e2 && e1 > s2`. Touching boundaries do not conflict.
pub fn ranges_overlap(start1: u32, end1: u32, start2: u32, end2: u32) -> bool {
    start1 < end2 && end1 > start2
}

/// Whether a candidate range collides with any resolved occurrence.
///
/// `exclude` drops occurrences whose id or `repeat_parent_id` matches, so an
/// edited record does not conflict with itself (nor with its own virtual
/// expansion). Occurrences with unparseable times are skipped; they were
/// validated on the way in and cannot meaningfully occupy a slot.
pub fn slot_occupied(
    occurrences: &[TimeBox],
    start: &str,
    end: &str,
    exclude: Option<&str>,
) -> Result<bool, FormatError> {
    let candidate_start = time_to_minutes(start)?;
    let candidate_end = time_to_minutes(end)?;

    let occupied = occurrences
        .iter()
        .filter(|occurrence| match exclude {
            Some(excluded) => {
                occurrence.id != excluded
                    && occurrence.repeat_parent_id.as_deref() != Some(excluded)
            }
            None => true,
        })
        .filter_map(|occurrence| {
            let occ_start = time_to_minutes(&occurrence.start_time).ok()?;
            let occ_end = time_to_minutes(&occurrence.end_time).ok()?;
            Some((occ_start, occ_end))
        })
        .any(|(occ_start, occ_end)| {
            ranges_overlap(candidate_start, candidate_end, occ_start, occ_end)
        });
    Ok(occupied)
}
