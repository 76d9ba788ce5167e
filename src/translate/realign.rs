use tracing::warn;

use crate::subtitle::SubtitleEntry;

/// Map translated chunk output back onto the original timed entries.
///
/// Each chunk is resegmented on `delimiter` (a heuristic; there is no
/// guaranteed correspondence between translated fragment boundaries and the
/// original entry boundaries), fragments are assigned to entries in order,
/// fragments beyond the last entry are discarded, and entries left without a
/// fragment keep their original text. The result always contains exactly as
/// many entries as the input, in the original chronological order, with the
/// original timings.
pub fn realign(
    translated_chunks: &[String],
    entries: &[SubtitleEntry],
    delimiter: &str,
) -> Vec<SubtitleEntry> {
    let total = entries.len();
    let mut result = Vec::with_capacity(total);
    let mut offset = 0;
    let mut discarded = 0usize;

    for chunk in translated_chunks {
        for fragment in chunk.split(delimiter) {
            if offset < total {
                let mut entry = entries[offset].clone();
                entry.text = fragment.trim().to_string();
                result.push(entry);
                offset += 1;
            } else {
                discarded += 1;
            }
        }
    }

    if discarded > 0 {
        warn!(
            "Translation produced {} more fragments than the {} timed entries; extras discarded",
            discarded, total
        );
    }

    if offset < total {
        warn!(
            "Translation produced {} fragments for {} timed entries; keeping original text for the remainder",
            offset, total
        );
        result.extend_from_slice(&entries[offset..]);
    }

    result
}
