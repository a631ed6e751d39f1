//! Byte-level scanning of transcript markup.
//!
//! Entity links look like `<a exist="4221" noun="troll">a forest troll</a>`.
//! Links wrapped in `<pushBold/>`/`<popBold/>` emphasis denote active
//! combatants; that wrapping is the only signal separating them from the
//! scenery and equipment links appearing on the same lines.

use memchr::memchr;
use memchr::memmem;

use super::event::CreatureRef;

const BOLD_OPEN: &[u8] = b"<pushBold/>";
const BOLD_CLOSE: &[u8] = b"<popBold/>";
const LINK_OPEN: &[u8] = b"<a exist=\"";
const NOUN_ATTR: &[u8] = b"noun=\"";
const BOUNDARY_TAG: &[u8] = b"<prompt";

/// A line carrying the prompt tag marks the end of one server update.
pub fn is_update_boundary(line: &str) -> bool {
    memmem::find(line.as_bytes(), BOUNDARY_TAG).is_some()
}

/// Parse the entity link whose `<a exist="` opener starts at `start`.
fn link_at(fragment: &str, start: usize) -> Option<CreatureRef> {
    let bytes = fragment.as_bytes();

    let id_start = start + LINK_OPEN.len();
    let id_end = id_start + memchr(b'"', bytes.get(id_start..)?)?;
    let id = fragment[id_start..id_end].parse::<i64>().ok()?;
    // Non-positive ids are sentinels, not creatures
    if id <= 0 {
        return None;
    }

    let noun_start = id_end + memmem::find(&bytes[id_end..], NOUN_ATTR)? + NOUN_ATTR.len();
    let noun_end = noun_start + memchr(b'"', bytes.get(noun_start..)?)?;

    let text_start = noun_end + memchr(b'>', &bytes[noun_end..])? + 1;
    let text_end = text_start + memchr(b'<', bytes.get(text_start..)?)?;

    Some(CreatureRef {
        id,
        noun: fragment[noun_start..noun_end].to_string(),
        name: fragment[text_start..text_end].to_string(),
    })
}

/// First entity link in `fragment`, emphasis or not. Used on spans already
/// isolated by a pattern capture group.
pub fn first_entity(fragment: &str) -> Option<CreatureRef> {
    let bytes = fragment.as_bytes();
    let mut from = 0;
    while let Some(pos) = memmem::find(&bytes[from..], LINK_OPEN) {
        let at = from + pos;
        if let Some(link) = link_at(fragment, at) {
            return Some(link);
        }
        from = at + LINK_OPEN.len();
    }
    None
}

/// First emphasis-wrapped entity link in the line.
pub fn first_bold_entity(line: &str) -> Option<CreatureRef> {
    let bytes = line.as_bytes();
    let mut from = 0;
    while let Some(pos) = memmem::find(&bytes[from..], BOLD_OPEN) {
        let open = from + pos + BOLD_OPEN.len();
        // Unterminated emphasis runs to end of line
        let close = memmem::find(&bytes[open..], BOLD_CLOSE)
            .map(|p| open + p)
            .unwrap_or(line.len());
        if let Some(link) = first_entity(&line[open..close]) {
            return Some(link);
        }
        if close >= line.len() {
            break;
        }
        from = close + BOLD_CLOSE.len();
    }
    None
}

pub fn has_bold_entity(line: &str) -> bool {
    first_bold_entity(line).is_some()
}
