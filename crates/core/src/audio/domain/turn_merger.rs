use std::collections::HashSet;

use super::transcript::{SentenceFragment, SpeakerTurn};

/// Collapse speaker-attributed fragments into maximal same-speaker turns.
///
/// Texts within one run concatenate without a separator: consecutive
/// fragments from one speaker belong to a single continuous utterance.
/// Fragments without a speaker are skipped.
pub fn collapse_turns(fragments: &[&SentenceFragment]) -> Vec<SpeakerTurn> {
    let mut turns: Vec<SpeakerTurn> = Vec::new();
    for fragment in fragments {
        let speaker = match fragment.speaker {
            Some(speaker) => speaker,
            None => continue,
        };
        match turns.last_mut() {
            Some(turn) if turn.speaker == speaker => turn.text.push_str(&fragment.text),
            _ => turns.push(SpeakerTurn {
                speaker,
                text: fragment.text.clone(),
            }),
        }
    }
    turns
}

/// Merge one item's fragment sequence into final transcript text.
///
/// Non-contributing fragments (no speaker, empty text) are dropped first.
/// With fewer than two distinct speakers the conversational structure
/// carries no information, so the surviving texts are joined verbatim, one
/// per line, without speaker labels. Otherwise each turn becomes one
/// `Speaker_{id}: …` line. The pass is a single linear scan in temporal
/// order; the same fragment sequence always yields the same text.
pub fn merge_fragments(fragments: &[SentenceFragment]) -> String {
    let spoken: Vec<&SentenceFragment> = fragments.iter().filter(|f| f.contributes()).collect();
    if spoken.is_empty() {
        return String::new();
    }

    let speakers: HashSet<u32> = spoken.iter().filter_map(|f| f.speaker).collect();
    if speakers.len() < 2 {
        log::info!("fewer than two speakers detected, emitting unlabeled transcript");
        return spoken
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
    }

    collapse_turns(&spoken)
        .iter()
        .map(|turn| format!("Speaker_{}: {}", turn.speaker, turn.text))
        .collect::<Vec<_>>()
        .join("\n")
}
