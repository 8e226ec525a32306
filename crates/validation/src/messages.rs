//! User-facing messages. The pages are served in Spanish.

pub const PASSWORD_REQUIRED: &str = "La contraseña es requerida";
pub const PASSWORD_TOO_SHORT: &str = "La contraseña debe tener al menos 6 caracteres";
pub const PASSWORDS_DIFFER: &str = "Las contraseñas no coinciden";
pub const USERNAME_REQUIRED: &str = "El nombre de usuario es requerido";
pub const NAME_TOO_SHORT: &str = "El nombre debe tener al menos 2 caracteres";
pub const EMAIL_INVALID: &str = "Correo electrónico inválido";
pub const EMAIL_REQUIRED: &str = "Debe proporcionar un correo electrónico válido";
pub const PHONE_INVALID: &str = "Debe proporcionar un teléfono válido";
pub const DATE_IN_PAST: &str = "No puedes reservar para fechas pasadas";
pub const DATE_INVALID: &str = "Fecha inválida";
pub const BIRTH_DATE_INVALID: &str = "Fecha de nacimiento inválida";

/// Label used when a field has no `<label>` to name it.
pub const FALLBACK_LABEL: &str = "Este campo";

/// `"{label} es requerido"`.
pub fn required(label: &str) -> String {
    format!("{label} es requerido")
}
