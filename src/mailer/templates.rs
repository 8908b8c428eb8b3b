use super::EmailMessage;

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn otp_email(from: &str, to: &str, otp: u32, ttl_minutes: i64) -> EmailMessage {
    let html = format!(
        r#"
      <h2>Email Verification</h2>
      <p>Your OTP is:</p>
      <h1>{otp}</h1>
      <p>Valid for {ttl_minutes} minutes.</p>
    "#
    );
    EmailMessage {
        from: from.to_string(),
        to: to.to_string(),
        reply_to: None,
        subject: "Your OTP Code".to_string(),
        body_html: Some(html),
        body_text: Some(format!(
            "Your OTP is {otp}. Valid for {ttl_minutes} minutes."
        )),
    }
}

/// A message from a signed-in account to the support inbox; replies go to the sender.
pub fn contact_email(
    from: &str,
    to: &str,
    user_id: i32,
    user_email: &str,
    subject: &str,
    message: &str,
) -> EmailMessage {
    let html = format!(
        r#"
      <h2>Contact from user {user_id}</h2>
      <p><strong>From:</strong> {}</p>
      <p>{}</p>
    "#,
        escape_html(user_email),
        escape_html(message)
    );
    EmailMessage {
        from: from.to_string(),
        to: to.to_string(),
        reply_to: Some(user_email.to_string()),
        subject: subject.to_string(),
        body_html: Some(html),
        body_text: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otp_email_carries_code() {
        let mail = otp_email("noreply@x.dev", "a@b.com", 4821, 5);
        assert_eq!(mail.to, "a@b.com");
        assert_eq!(mail.subject, "Your OTP Code");
        assert!(mail.body_html.as_deref().unwrap_or_default().contains("<h1>4821</h1>"));
        assert!(mail.body_text.as_deref().unwrap_or_default().contains("5 minutes"));
    }

    #[test]
    fn contact_email_replies_to_user_and_escapes_message() {
        let mail = contact_email(
            "contact@x.dev",
            "support@x.dev",
            12,
            "user@b.com",
            "Late delivery",
            "<script>alert(1)</script>",
        );
        assert_eq!(mail.reply_to.as_deref(), Some("user@b.com"));
        let html = mail.body_html.unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }
}
