//! Minimal HTML rendering for [`View`].
//!
//! There is deliberately no templating engine here; the flow picks a view
//! and this module turns it into a small self-contained form page. A real
//! deployment would swap this module for its own rendering.

use crate::flow::{
    commands::{ChangePasswordCommand, ForgotPasswordCommand, LoginCommand, Validation},
    service::ResetRequestValidation,
    urls, View,
};
use axum::response::Html;

/// Minimal HTML escaping for attribute and text positions.
fn escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n<h1>{}</h1>\n{}\n</body>\n</html>",
        escape(title),
        escape(title),
        body
    )
}

fn errors_block(validation: &Validation) -> String {
    if validation.is_valid() {
        return String::new();
    }
    let items: String = validation
        .errors()
        .iter()
        .map(|error| format!("<li>{}</li>", escape(&error.message)))
        .collect();
    format!("<ul class=\"validation-errors\">{items}</ul>")
}

fn login(command: &LoginCommand) -> String {
    // No action attribute: the form posts back to the current URL so a
    // pending ?return_url query survives the round trip.
    let body = format!(
        "{errors}<form method=\"post\">\n\
         <label>Username <input name=\"username\" value=\"{username}\"></label>\n\
         <label>Password <input name=\"password\" type=\"password\"></label>\n\
         <button type=\"submit\">Sign in</button>\n\
         </form>\n\
         <p><a href=\"{forgot}\">Forgot password?</a></p>",
        errors = errors_block(&command.validation),
        username = escape(&command.username),
        forgot = urls::FORGOT_PASSWORD,
    );
    page("Sign in", &body)
}

fn change_password(command: &ChangePasswordCommand) -> String {
    let return_url = command
        .return_url
        .as_deref()
        .map(|url| {
            format!(
                "<input type=\"hidden\" name=\"return_url\" value=\"{}\">",
                escape(url)
            )
        })
        .unwrap_or_default();
    let body = format!(
        "{errors}<form method=\"post\">\n\
         <label>Username <input name=\"username\" value=\"{username}\"></label>\n\
         <label>Current password <input name=\"current_password\" type=\"password\"></label>\n\
         <label>New password <input name=\"new_password\" type=\"password\"></label>\n\
         {return_url}\
         <button type=\"submit\">Change password</button>\n\
         </form>",
        errors = errors_block(&command.validation),
        username = escape(&command.username),
    );
    page("Change password", &body)
}

fn change_password_complete(return_url: Option<&str>) -> String {
    let link = return_url.unwrap_or(urls::LOGIN);
    let body = format!(
        "<p>Your password has been changed.</p>\n<p><a href=\"{}\">Continue</a></p>",
        escape(link)
    );
    page("Password changed", &body)
}

fn forgot_password(command: &ForgotPasswordCommand) -> String {
    let body = format!(
        "{errors}<p>If an account exists for the address you enter, a reset link will be sent to it.</p>\n\
         <form method=\"post\" action=\"{action}\">\n\
         <label>Email <input name=\"username\" value=\"{username}\"></label>\n\
         <button type=\"submit\">Send reset link</button>\n\
         </form>",
        errors = errors_block(&command.validation),
        action = urls::FORGOT_PASSWORD,
        username = escape(&command.username),
    );
    page("Forgot password", &body)
}

fn reset_password(command: &crate::flow::commands::PasswordResetCommand) -> String {
    let body = format!(
        "{errors}<form method=\"post\" action=\"{action}\">\n\
         <input type=\"hidden\" name=\"request_id\" value=\"{request_id}\">\n\
         <input type=\"hidden\" name=\"token\" value=\"{token}\">\n\
         <label>New password <input name=\"new_password\" type=\"password\"></label>\n\
         <button type=\"submit\">Reset password</button>\n\
         </form>",
        errors = errors_block(&command.validation),
        action = urls::RESET_PASSWORD,
        request_id = escape(&command.request_id),
        token = escape(&command.token),
    );
    page("Reset password", &body)
}

fn reset_password_invalid(result: &ResetRequestValidation) -> String {
    let body = format!(
        "{}\n<p><a href=\"{}\">Request a new reset link</a></p>",
        errors_block(&result.validation),
        urls::FORGOT_PASSWORD
    );
    page("Invalid password reset request", &body)
}

fn reset_password_complete() -> String {
    let body = format!(
        "<p>Your password has been reset.</p>\n<p><a href=\"{}\">Sign in</a></p>",
        urls::LOGIN
    );
    page("Password reset complete", &body)
}

pub fn render(view: &View) -> Html<String> {
    let html = match view {
        View::Login(command) => login(command),
        View::ChangePassword(command) => change_password(command),
        View::ChangePasswordComplete { return_url } => {
            change_password_complete(return_url.as_deref())
        }
        View::ForgotPassword(command) => forgot_password(command),
        View::ResetPassword(command) => reset_password(command),
        View::ResetPasswordInvalid(result) => reset_password_invalid(result),
        View::ResetPasswordComplete => reset_password_complete(),
    };
    Html(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::commands::PasswordResetCommand;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape("<script>\"&\"</script>"),
            "&lt;script&gt;&quot;&amp;&quot;&lt;/script&gt;"
        );
    }

    #[test]
    fn test_login_view_preserves_submitted_username() {
        let mut command = LoginCommand {
            username: "alice".to_string(),
            ..LoginCommand::default()
        };
        command.validation.add("password", "Password is required");

        let Html(html) = render(&View::Login(command));
        assert!(html.contains("value=\"alice\""));
        assert!(html.contains("Password is required"));
        // Passwords are never echoed back.
        assert!(!html.contains("name=\"password\" value"));
    }

    #[test]
    fn test_login_view_escapes_hostile_username() {
        let command = LoginCommand {
            username: "\"><script>".to_string(),
            ..LoginCommand::default()
        };
        let Html(html) = render(&View::Login(command));
        assert!(!html.contains("\"><script>"));
    }

    #[test]
    fn test_reset_password_view_carries_link_parameters() {
        let command = PasswordResetCommand {
            request_id: "4f9c2e1a-aaaa-bbbb-cccc-1234567890ab".to_string(),
            token: "reset-token".to_string(),
            ..PasswordResetCommand::default()
        };
        let Html(html) = render(&View::ResetPassword(command));
        assert!(html.contains("name=\"request_id\" value=\"4f9c2e1a-aaaa-bbbb-cccc-1234567890ab\""));
        assert!(html.contains("name=\"token\" value=\"reset-token\""));
    }

    #[test]
    fn test_invalid_reset_view_carries_validation_detail() {
        let result = ResetRequestValidation::invalid("Token has expired");
        let Html(html) = render(&View::ResetPasswordInvalid(result));
        assert!(html.contains("Token has expired"));
        assert!(html.contains(urls::FORGOT_PASSWORD));
    }

    #[test]
    fn test_change_password_complete_falls_back_to_login_link() {
        let Html(html) = render(&View::ChangePasswordComplete { return_url: None });
        assert!(html.contains(urls::LOGIN));
    }
}
