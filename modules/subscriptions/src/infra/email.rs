//! HTML body of the expiry reminder mail.

use chrono::{DateTime, Datelike, Utc};

pub const REMINDER_SUBJECT: &str = "🔔 Rappel : Votre abonnement arrive à expiration";

/// Reminder mail sent once inside the 7-day window before expiry.
pub fn reminder_email(prenom: &str, end_date: DateTime<Utc>) -> String {
    let expiry = end_date.format("%d/%m/%Y %H:%M");
    let year = Utc::now().year();
    format!(
        r#"<!DOCTYPE html>
<html lang="fr">
<head>
  <meta charset="UTF-8">
</head>
<body style="font-family:Arial,sans-serif; background-color:#f8f9fa; margin:0; padding:0; color:#333333; line-height:1.6;">
  <div style="max-width:600px; margin:30px auto; background-color:#ffffff; border-radius:10px; box-shadow:0 2px 8px rgba(0,0,0,0.1); overflow:hidden;">
    <div style="background-color:#007BFF; color:white; text-align:center; padding:20px; font-size:20px; font-weight:bold;">
      🔔 Rappel d'expiration d'abonnement
    </div>
    <div style="padding:25px;">
      <p>Bonjour <strong>{prenom}</strong>,</p>
      <p>Nous vous rappelons que votre abonnement sur la plateforme <span style="color:#007BFF; font-weight:bold;">VitalFeed</span> arrivera à expiration le <strong>{expiry}</strong>.</p>
      <p>⏳ Il vous reste moins de 7 jours pour le renouveler afin d'éviter toute interruption de service.</p>
      <p>Pour renouveler votre abonnement, veuillez vous connecter à votre espace client dès maintenant.</p>
      <p>Merci de votre confiance et de votre fidélité 💙</p>
      <p>Cordialement,<br><strong>L'équipe VitalFeed</strong></p>
    </div>
    <div style="background-color:#f1f1f1; text-align:center; padding:15px; font-size:13px; color:#555555;">
      © {year} VitalFeed – Tous droits réservés | Support : support@veterinaire.com
    </div>
  </div>
</body>
</html>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn reminder_email_embeds_name_and_formatted_date() {
        let end = Utc.with_ymd_and_hms(2026, 3, 15, 18, 30, 0).unwrap();
        let body = reminder_email("Alice", end);
        assert!(body.contains("Bonjour <strong>Alice</strong>"));
        assert!(body.contains("15/03/2026 18:30"));
    }
}
