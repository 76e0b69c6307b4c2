//! Password recovery: ask for the email, mail a one-time code, check it,
//! then take the new password twice.

use std::time::{Duration, Instant};

use rand::Rng;

use super::form::{CharFilter, Form, FormAction, TextField};
use super::Services;
use crate::account::validate_password;
use crate::game::input::InputEvent;

pub const CODE_LEN: usize = 6;
pub const CODE_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryStep {
    Email,
    Code,
    Password,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedCode {
    pub email: String,
    pub code: String,
    pub issued_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeError {
    Expired,
    Malformed,
    Mismatch,
}

impl CodeError {
    pub fn message(&self) -> &'static str {
        match self {
            CodeError::Expired => "The code has expired. Request a new one.",
            CodeError::Malformed => "The code has 6 digits.",
            CodeError::Mismatch => "Incorrect code.",
        }
    }
}

pub fn generate_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{:06}", rng.gen_range(0..1_000_000u32))
}

impl IssuedCode {
    /// Expiry is checked first, whatever was typed.
    pub fn verify(&self, input: &str, now: Instant) -> Result<(), CodeError> {
        if now.saturating_duration_since(self.issued_at) > CODE_TTL {
            return Err(CodeError::Expired);
        }
        if input.len() != CODE_LEN || !input.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CodeError::Malformed);
        }
        if input != self.code {
            return Err(CodeError::Mismatch);
        }
        Ok(())
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        CODE_TTL.saturating_sub(now.saturating_duration_since(self.issued_at))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryOutcome {
    Open,
    Closed,
    Completed,
}

/// Modal owned by the login screen. While open it receives every input.
#[derive(Debug, Clone)]
pub struct RecoveryModal {
    step: RecoveryStep,
    form: Form,
    issued: Option<IssuedCode>,
}

impl Default for RecoveryModal {
    fn default() -> Self {
        Self::new()
    }
}

impl RecoveryModal {
    pub fn new() -> Self {
        Self { step: RecoveryStep::Email, form: Self::form_for(RecoveryStep::Email), issued: None }
    }

    fn form_for(step: RecoveryStep) -> Form {
        match step {
            RecoveryStep::Email => Form::new(vec![TextField::new("Email")]),
            RecoveryStep::Code => Form::new(vec![TextField::new("Code")
                .filter(CharFilter::Digits)
                .max_len(CODE_LEN)]),
            RecoveryStep::Password => Form::new(vec![
                TextField::new("New password").masked(),
                TextField::new("Confirm password").masked(),
            ]),
        }
    }

    fn goto(&mut self, step: RecoveryStep) {
        log::debug!("Recovery {:?} -> {:?}", self.step, step);
        self.step = step;
        self.form = Self::form_for(step);
    }

    pub fn step(&self) -> RecoveryStep {
        self.step
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn issued(&self) -> Option<&IssuedCode> {
        self.issued.as_ref()
    }

    pub fn handle_input(&mut self, ev: &InputEvent, svc: &mut Services) -> RecoveryOutcome {
        let InputEvent::Key(key) = ev else {
            return RecoveryOutcome::Open;
        };
        match self.form.handle_key(key) {
            FormAction::Cancel => RecoveryOutcome::Closed,
            FormAction::None => RecoveryOutcome::Open,
            FormAction::Submit => match self.step {
                RecoveryStep::Email => self.submit_email(svc),
                RecoveryStep::Code => self.submit_code(svc),
                RecoveryStep::Password => self.submit_password(svc),
            },
        }
    }

    fn submit_email(&mut self, svc: &mut Services) -> RecoveryOutcome {
        let email = self.form.value(0).trim().to_string();
        let Some(player) = svc.directory.find_by_email(&email) else {
            svc.banner.error("No account with that email.");
            return RecoveryOutcome::Open;
        };
        let code = generate_code(&mut *svc.rng);
        if let Err(e) = svc.mailer.send_code(&player.email, &code) {
            log::warn!("Recovery mail failed: {}", e);
            svc.banner.error("Could not send the code. Try again.");
            return RecoveryOutcome::Open;
        }
        self.issued = Some(IssuedCode { email: player.email, code, issued_at: svc.now });
        svc.banner.info("A 6-digit code was sent to your email.");
        self.goto(RecoveryStep::Code);
        RecoveryOutcome::Open
    }

    fn submit_code(&mut self, svc: &mut Services) -> RecoveryOutcome {
        let Some(issued) = &self.issued else {
            self.goto(RecoveryStep::Email);
            return RecoveryOutcome::Open;
        };
        match issued.verify(self.form.value(0), svc.now) {
            Ok(()) => {
                svc.banner.success("Code accepted.");
                self.goto(RecoveryStep::Password);
            }
            Err(CodeError::Expired) => {
                svc.banner.error(CodeError::Expired.message());
                self.issued = None;
                self.goto(RecoveryStep::Email);
            }
            Err(e) => svc.banner.error(e.message()),
        }
        RecoveryOutcome::Open
    }

    fn submit_password(&mut self, svc: &mut Services) -> RecoveryOutcome {
        let (pw, confirm) = (self.form.value(0), self.form.value(1));
        if pw != confirm {
            svc.banner.error("Passwords do not match.");
            return RecoveryOutcome::Open;
        }
        if let Err(e) = validate_password(pw) {
            svc.banner.error(&e.0);
            return RecoveryOutcome::Open;
        }
        let Some(issued) = &self.issued else {
            self.goto(RecoveryStep::Email);
            return RecoveryOutcome::Open;
        };
        match svc.directory.set_password(&issued.email, pw) {
            Ok(()) => {
                svc.banner.success("Password updated. You can log in now.");
                RecoveryOutcome::Completed
            }
            Err(e) => {
                svc.banner.error(&e.0);
                RecoveryOutcome::Open
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn issued(at: Instant) -> IssuedCode {
        IssuedCode { email: "nova@galaxy.io".into(), code: "042137".into(), issued_at: at }
    }

    #[test]
    fn code_valid_until_five_minutes() {
        let t0 = Instant::now();
        let c = issued(t0);
        assert_eq!(c.verify("042137", t0 + Duration::from_secs(299)), Ok(()));
        assert_eq!(c.verify("042137", t0 + Duration::from_secs(300)), Ok(()));
        assert_eq!(c.verify("042137", t0 + Duration::from_secs(301)), Err(CodeError::Expired));
        assert_eq!(c.verify("999999", t0 + Duration::from_secs(301)), Err(CodeError::Expired));
    }

    #[test]
    fn code_format_is_six_ascii_digits() {
        let t0 = Instant::now();
        let c = issued(t0);
        assert_eq!(c.verify("42137", t0), Err(CodeError::Malformed));
        assert_eq!(c.verify("04213a", t0), Err(CodeError::Malformed));
        assert_eq!(c.verify("０42137", t0), Err(CodeError::Malformed));
        assert_eq!(c.verify("042138", t0), Err(CodeError::Mismatch));
    }

    #[test]
    fn generated_codes_are_zero_padded() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let code = generate_code(&mut rng);
            assert_eq!(code.len(), CODE_LEN);
            assert!(code.bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn remaining_time_counts_down() {
        let t0 = Instant::now();
        let c = issued(t0);
        assert_eq!(c.remaining(t0 + Duration::from_secs(60)), Duration::from_secs(240));
        assert_eq!(c.remaining(t0 + Duration::from_secs(900)), Duration::ZERO);
    }
}
