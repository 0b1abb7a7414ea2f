use crate::data::student::SubmissionPayload;
use maud::html;

/// Builds the chat notification for a finished test.
///
/// Goes out with `parse_mode: HTML`, so every interpolated value is escaped by `maud` - a `<` in
/// someone's name would otherwise make Telegram reject the whole message.
pub fn recording_message(payload: &SubmissionPayload) -> String {
    let SubmissionPayload {
        student_info: student,
        set_name,
    } = payload;

    let markup = html! {
        "🎤 New Speaking Test Completed!\n\n"
        "👤 Student: " (student.first_name) " " (student.surname) "\n"
        "👥 Group: " (student.group) "\n"
        "📚 Set: " (set_name) "\n"
        "📅 Date: " (student.date) "\n"
        "⏰ Time: " (student.time) "\n"
        "🌟 Practice makes perfect!"
    };

    markup.into_string().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::student::StudentInfo;
    use pretty_assertions::assert_eq;

    fn payload(first_name: &str, surname: &str, set_name: &str) -> SubmissionPayload {
        SubmissionPayload {
            student_info: StudentInfo {
                first_name: first_name.into(),
                surname: surname.into(),
                group: "B2".into(),
                date: "2024-05-01".into(),
                time: "10:00".into(),
            },
            set_name: set_name.into(),
        }
    }

    #[test]
    fn contains_every_detail() {
        let message = recording_message(&payload("Ana", "Lee", "Set 3"));

        for expected in ["Ana Lee", "B2", "Set 3", "2024-05-01", "10:00"] {
            assert!(message.contains(expected), "{expected:?} missing from {message:?}");
        }
    }

    #[test]
    fn matches_the_template() {
        let message = recording_message(&payload("Ana", "Lee", "Set 3"));

        assert_eq!(
            message,
            "🎤 New Speaking Test Completed!\n\
             \n\
             👤 Student: Ana Lee\n\
             👥 Group: B2\n\
             📚 Set: Set 3\n\
             📅 Date: 2024-05-01\n\
             ⏰ Time: 10:00\n\
             🌟 Practice makes perfect!"
        );
    }

    #[test]
    fn markup_in_names_is_escaped() {
        let message = recording_message(&payload("<b>Ana</b>", "Lee & Co", "Set \"3\""));

        assert!(message.contains("&lt;b&gt;Ana&lt;/b&gt; Lee &amp; Co"));
        assert!(message.contains("Set &quot;3&quot;"));
        assert!(!message.contains("<b>"));
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let message = recording_message(&payload("  Ana", "Lee", "Set 3  "));

        assert!(message.starts_with("🎤"));
        assert!(message.ends_with("perfect!"));
    }
}
