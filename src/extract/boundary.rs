// Zone split within one clause: everything up to and including the first
// '시' is the time fragment, text between '시' and '에서' is the place
// fragment, and whatever follows '에서' is the event residual. Without '시'
// the whole clause is the residual.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseParts {
    pub time_part: Option<String>,
    pub place_part: Option<String>,
    pub event_part: String,
}

pub fn split_clause(text: &str) -> ClauseParts {
    let Some(si_idx) = text.find('시') else {
        return ClauseParts {
            time_part: None,
            place_part: None,
            event_part: text.trim().to_string(),
        };
    };
    let si_end = si_idx + '시'.len_utf8();
    let time_part = text[..si_end].trim().to_string();
    let rest = &text[si_end..];

    match rest.find("에서") {
        Some(eseo_idx) => {
            let place = rest[..eseo_idx].trim();
            let event = rest[eseo_idx + "에서".len()..].trim();
            ClauseParts {
                time_part: Some(time_part),
                place_part: if place.is_empty() {
                    None
                } else {
                    Some(place.to_string())
                },
                event_part: event.to_string(),
            }
        }
        None => ClauseParts {
            time_part: Some(time_part),
            place_part: None,
            event_part: String::new(),
        },
    }
}
