use serde::{Deserialize, Serialize};

/// Roster entry from the students collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub username: String,
    pub password: String,
    pub name: String,
    pub email: Option<String>,
}

/// Checks credentials against the roster, returning the matching record on
/// success. Passwords compare as the opaque strings the data files hold;
/// hashing and lockout are explicitly out of scope.
pub fn authenticate<'a>(
    username: &str,
    password: &str,
    roster: &'a [StudentRecord],
) -> Option<&'a StudentRecord> {
    roster
        .iter()
        .find(|student| student.username == username)
        .filter(|student| student.password == password)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<StudentRecord> {
        vec![
            StudentRecord {
                username: "avery".to_string(),
                password: "hunter2".to_string(),
                name: "Avery Lee".to_string(),
                email: Some("avery@example.com".to_string()),
            },
            StudentRecord {
                username: "blake".to_string(),
                password: "letmein".to_string(),
                name: "Blake Ortiz".to_string(),
                email: None,
            },
        ]
    }

    #[test]
    fn valid_credentials_return_the_record() {
        let roster = roster();
        let student = authenticate("avery", "hunter2", &roster).expect("login succeeds");
        assert_eq!(student.name, "Avery Lee");
    }

    #[test]
    fn wrong_password_fails() {
        assert!(authenticate("avery", "hunter3", &roster()).is_none());
    }

    #[test]
    fn unknown_user_fails() {
        assert!(authenticate("casey", "hunter2", &roster()).is_none());
    }

    #[test]
    fn usernames_are_case_sensitive() {
        assert!(authenticate("Avery", "hunter2", &roster()).is_none());
    }
}
