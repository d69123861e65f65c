use maud::{html, Markup};

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        section class="card" {
            h3 { (title) }
            (body)
        }
    }
}

pub fn email_cta_form() -> Markup {
    html! {
        form action="/login" method="post" class="email-cta" {
            label for="email" { "Email" }
            input type="email" id="email" name="email" placeholder="you@example.com" required;
            button type="submit" { "Send sign-in link" }
        }
    }
}

/// Thousands-grouped BDT amount, e.g. 33000000 -> "33,000,000".
pub fn fmt_money(amount: i64) -> String {
    let negative = amount < 0;
    let digits = amount.abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if negative {
        format!("-{out}")
    } else {
        out
    }
}
