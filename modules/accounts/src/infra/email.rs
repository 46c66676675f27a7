//! HTML body of the welcome mail sent after registration.

use chrono::{Datelike, Utc};

pub const WELCOME_SUBJECT: &str = "Bienvenue sur VITALFEED – Votre espace vétérinaire est prêt";

/// Welcome mail carrying the generated credentials and onboarding links.
pub fn welcome_email(
    nom: &str,
    email: &str,
    password: &str,
    portal_url: &str,
    app_download_url: &str,
) -> String {
    let year = Utc::now().year();
    format!(
        r#"<html>
<body style="margin:0; padding:0; background-color:#f4f6f8; font-family:'Segoe UI',Roboto,Helvetica,Arial,sans-serif; color:#333;">
  <table align="center" width="100%" cellpadding="0" cellspacing="0" style="max-width:650px; margin:auto; background-color:#ffffff; border-radius:10px; overflow:hidden;">
    <tr>
      <td style="background-color:#00897B; padding:25px 40px; text-align:center;">
        <h1 style="margin:0; color:#ffffff; font-size:24px;">VITALFEED</h1>
        <p style="color:#dff9f3; margin:5px 0 0; font-size:14px;">Simplifiez et modernisez votre pratique vétérinaire dès aujourd'hui</p>
      </td>
    </tr>
    <tr>
      <td style="padding:40px;">
        <h2 style="color:#2c3e50;">Bienvenue sur VITALFEED 🩺</h2>
        <p style="font-size:15px; line-height:1.6;">
          Bonjour Dr <strong>{nom}</strong>,<br><br>
          Nous sommes ravis de vous accueillir sur <strong>VITALFEED</strong>, votre nouvel espace digital conçu spécialement pour les vétérinaires.
        </p>
        <div style="margin-top:25px;">
          <h3 style="color:#00897B; font-size:17px; border-bottom:2px solid #eaf0f6; padding-bottom:6px;">Vos identifiants de connexion</h3>
          <table width="100%" cellpadding="0" cellspacing="0" style="margin-top:10px; border-collapse:collapse; font-size:14px;">
            <tr>
              <td style="padding:8px; color:#555;">Adresse e-mail :</td>
              <td style="padding:8px; text-align:right; font-weight:600;">{email}</td>
            </tr>
            <tr style="background-color:#f9fbfd;">
              <td style="padding:8px; color:#555;">Mot de passe temporaire :</td>
              <td style="padding:8px; text-align:right; font-weight:600;">{password}</td>
            </tr>
          </table>
          <p style="margin-top:10px; font-size:13px; color:#777;">⚠️ Pour des raisons de sécurité, veuillez changer votre mot de passe dès votre première connexion.</p>
        </div>
        <div style="margin-top:30px;">
          <h3 style="color:#00897B; font-size:17px;">Prochaines étapes :</h3>
          <ol style="font-size:15px; line-height:1.8; padding-left:20px;">
            <li>Accédez à votre <strong>Espace Vétérinaire</strong> : <a href="{portal_url}" style="color:#00897B; text-decoration:none; font-weight:600;">Connexion</a>.</li>
            <li>Choisissez le type d'abonnement de votre choix directement depuis votre espace web.</li>
            <li>Si vous avez déjà un abonnement actif, téléchargez l'application <strong>VITALFEED</strong> et connectez-vous avec les mêmes identifiants.</li>
          </ol>
          <p style="margin-top:20px; text-align:center;">
            <a href="{app_download_url}" style="color:#ffffff; background-color:#00897B; padding:12px 25px; border-radius:6px; text-decoration:none; font-weight:600; display:inline-block;">Télécharger l'application VITALFEED</a>
          </p>
        </div>
        <div style="margin-top:35px;">
          <p style="margin-top:20px; font-weight:600;">Bien cordialement,</p>
          <p style="margin-top:5px; color:#00897B; font-weight:700;">L'équipe VITALFEED</p>
        </div>
      </td>
    </tr>
    <tr>
      <td style="background-color:#f0f3f7; padding:15px 30px; text-align:center; font-size:12px; color:#777;">
        Cet e-mail a été envoyé automatiquement, merci de ne pas y répondre directement.<br>
        © {year} VITALFEED – Tous droits réservés.
      </td>
    </tr>
  </table>
</body>
</html>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn welcome_email_embeds_credentials_and_links() {
        let body = welcome_email(
            "Dupont",
            "vet@example.com",
            "s3cr3t!pass12",
            "https://portal.example",
            "https://dl.example",
        );
        assert!(body.contains("Dr <strong>Dupont</strong>"));
        assert!(body.contains("vet@example.com"));
        assert!(body.contains("s3cr3t!pass12"));
        assert!(body.contains("https://portal.example"));
        assert!(body.contains("https://dl.example"));
    }
}
