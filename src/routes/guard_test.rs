use super::*;
use crate::net::types::User;

fn signed_in() -> Session {
    let user: User = serde_json::from_value(serde_json::json!({ "username": "alice" })).unwrap();
    Session::authenticated(user)
}

#[test]
fn decision_table() {
    let cases = [
        (true, Session::anonymous(), Decision::Redirect { to: "/login", from: Some("/add-post".into()) }),
        (true, signed_in(), Decision::Render),
        (false, Session::anonymous(), Decision::Render),
        (false, signed_in(), Decision::Redirect { to: "/", from: None }),
    ];
    for (require, session, expected) in cases {
        assert_eq!(guard(require, &session, "/add-post"), expected, "require={require} status={}", session.status());
    }
}

#[test]
fn login_redirect_remembers_origin_path() {
    let decision = guard(true, &Session::anonymous(), "/edit-post/p42");
    assert_eq!(decision, Decision::Redirect { to: LOGIN_PATH, from: Some("/edit-post/p42".into()) });
}

#[test]
fn guest_redirect_ignores_target_path() {
    assert_eq!(guard(false, &signed_in(), "/login"), guard(false, &signed_in(), "/signup"));
}

#[test]
fn repeated_calls_agree() {
    let session = Session::anonymous();
    let first = guard(true, &session, "/all-posts");
    for _ in 0..10 {
        assert_eq!(guard(true, &session, "/all-posts"), first);
    }
}

#[test]
fn at_most_three_outcomes() {
    let mut outcomes = Vec::new();
    for require in [true, false] {
        for session in [Session::anonymous(), signed_in()] {
            let decision = guard(require, &session, "/x");
            if !outcomes.contains(&decision) {
                outcomes.push(decision);
            }
        }
    }
    assert_eq!(outcomes.len(), 3);
}
