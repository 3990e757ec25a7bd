//! 表单输入的校验与转义

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// 宽松的邮箱格式检查：`local@domain.tld`，不含空白，域名至少一个点
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > 254 || email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };
    if local.is_empty() || local.contains('@') || domain.is_empty() {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !tld.is_empty() && !domain.starts_with('.') && !domain.contains("..")
}

/// 转义插入 HTML 邮件正文的用户输入
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("jane@example.com"));
        assert!(is_valid_email("first.last+tag@sub.example.co"));
        assert!(!is_valid_email("jane@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("jane example@x.com"));
        assert!(!is_valid_email("jane@localhost"));
        assert!(!is_valid_email("jane@@example.com"));
        assert!(!is_valid_email("jane@example..com"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<script>alert('x') & \"y\"</script>"),
            "&lt;script&gt;alert(&#39;x&#39;) &amp; &quot;y&quot;&lt;/script&gt;"
        );
        assert_eq!(escape_html("plain text"), "plain text");
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank("   \n\t"));
        assert!(!is_blank(" a "));
    }
}
