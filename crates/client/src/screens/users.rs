//! User administration screen.

use gemelli_core::roles::Role;
use uuid::Uuid;

use super::{error_text, BannerSlot, Outcome};
use crate::api::{NewUser, OrgUnit, UserChanges, UserProfile};
use crate::client::ApiClient;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Backend messages for failed user creation and what the screen shows.
const CREATE_USER_ERRORS: &[(&str, &str)] = &[
    ("El usuario no fue creado en Auth", "El usuario no fue creado en Auth."),
    (
        "Falta UUID del usuario creado en Auth",
        "Falta UUID del usuario creado en Auth.",
    ),
    (
        "El perfil no fue creado en public.users",
        "No se pudo crear el perfil en public.users.",
    ),
    (
        "No se pudo guardar el perfil del usuario",
        "No se pudo crear el perfil en public.users.",
    ),
];

pub fn map_create_user_error(message: &str) -> String {
    CREATE_USER_ERRORS
        .iter()
        .find(|(backend, _)| *backend == message)
        .map(|(_, shown)| shown.to_string())
        .unwrap_or_else(|| message.to_string())
}

/// The "new user" form.
#[derive(Debug, Clone, PartialEq)]
pub struct UserForm {
    pub nombre: String,
    pub email: String,
    pub password: String,
    pub rol: Role,
    pub org_unit_id: Option<Uuid>,
    pub activo: bool,
}

impl Default for UserForm {
    fn default() -> Self {
        Self {
            nombre: String::new(),
            email: String::new(),
            password: String::new(),
            rol: Role::Docente,
            org_unit_id: None,
            activo: true,
        }
    }
}

pub struct UsersScreen {
    api: ApiClient,
    pub users: Vec<UserProfile>,
    pub org_units: Vec<OrgUnit>,
    pub form: UserForm,
    pub banner: BannerSlot,
    /// Row currently being updated.
    pub busy: Option<Uuid>,
    pub creating: bool,
}

impl UsersScreen {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            users: Vec::new(),
            org_units: Vec::new(),
            form: UserForm::default(),
            banner: BannerSlot::default(),
            busy: None,
            creating: false,
        }
    }

    /// Load users and org units.
    pub async fn mount(&mut self) {
        self.load_users().await;
        self.load_org_units().await;
    }

    /// Users ordered by name, case-insensitively.
    pub async fn load_users(&mut self) {
        match self.api.admin().list_users().await {
            Ok(mut users) => {
                users.sort_by_key(|u| u.nombre.to_lowercase());
                self.users = users;
            }
            Err(e) => self
                .banner
                .error(error_text(&e, "No se pudieron cargar los usuarios.")),
        }
    }

    pub async fn load_org_units(&mut self) {
        match self.api.admin().list_org_units().await {
            Ok(units) => self.org_units = units,
            Err(e) => self.banner.error(error_text(
                &e,
                "No se pudieron cargar las unidades organizacionales.",
            )),
        }
    }

    pub fn user(&self, id: Uuid) -> Option<&UserProfile> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn is_busy(&self, id: Uuid) -> bool {
        self.busy == Some(id)
    }

    /// Submit the form; on success it is reset and the list reloaded.
    pub async fn create_user(&mut self) -> Outcome {
        self.banner.clear();
        let form = &self.form;
        if form.nombre.trim().is_empty()
            || form.email.trim().is_empty()
            || form.password.trim().is_empty()
        {
            self.banner.error("Completa todos los campos obligatorios.");
            return Outcome::Failed;
        }

        let input = NewUser {
            nombre: form.nombre.trim().to_string(),
            email: form.email.trim().to_string(),
            password: form.password.clone(),
            rol: form.rol,
            org_unit_id: form.org_unit_id,
            activo: form.activo,
        };

        self.creating = true;
        let result = self.api.admin().create_user(&input).await;
        self.creating = false;

        match result {
            Ok(created) => {
                tracing::info!(user_id = %created.id, "User created");
                self.banner.success("Usuario creado correctamente.");
                self.form = UserForm::default();
                self.load_users().await;
                Outcome::Done
            }
            Err(e) => {
                let base = error_text(&e, "No se pudo crear el usuario.");
                self.banner.error(map_create_user_error(&base));
                Outcome::Failed
            }
        }
    }

    pub async fn change_role(&mut self, id: Uuid, rol: Role) -> Outcome {
        if self.user(id).and_then(UserProfile::role) == Some(rol) {
            return Outcome::Skipped;
        }
        let changes = UserChanges {
            rol: Some(rol),
            ..Default::default()
        };
        self.apply(
            id,
            changes,
            "Rol actualizado correctamente.",
            "No se pudo actualizar el rol del usuario.",
        )
        .await
    }

    /// `None` clears the user's org unit.
    pub async fn change_org_unit(&mut self, id: Uuid, org_unit_id: Option<Uuid>) -> Outcome {
        let current = self.user(id).and_then(|u| u.org_unit_id);
        if current == org_unit_id {
            return Outcome::Skipped;
        }
        let changes = UserChanges {
            org_unit_id: Some(org_unit_id),
            ..Default::default()
        };
        self.apply(
            id,
            changes,
            "Unidad organizacional actualizada.",
            "No se pudo actualizar la unidad organizacional.",
        )
        .await
    }

    pub async fn toggle_active(&mut self, id: Uuid) -> Outcome {
        let Some(activo) = self.user(id).map(|u| u.activo) else {
            return Outcome::Skipped;
        };
        let changes = UserChanges {
            activo: Some(!activo),
            ..Default::default()
        };
        self.apply(
            id,
            changes,
            "Estado del usuario actualizado.",
            "No se pudo actualizar el estado del usuario.",
        )
        .await
    }

    /// Set a temporary password. Empty input is a cancelled prompt; anything
    /// shorter than the minimum after trimming never reaches the API.
    pub async fn reset_password(&mut self, id: Uuid, password: &str) -> Outcome {
        if password.is_empty() {
            return Outcome::Skipped;
        }
        let password = password.trim();
        if password.chars().count() < MIN_PASSWORD_LEN {
            self.banner
                .error("La contraseña debe tener al menos 8 caracteres.");
            return Outcome::Failed;
        }
        let changes = UserChanges {
            password: Some(password.to_string()),
            ..Default::default()
        };
        self.apply(
            id,
            changes,
            "Contraseña restablecida correctamente.",
            "No se pudo restablecer la contraseña.",
        )
        .await
    }

    async fn apply(
        &mut self,
        id: Uuid,
        changes: UserChanges,
        success: &str,
        fallback: &str,
    ) -> Outcome {
        self.busy = Some(id);
        self.banner.clear();
        let result = self.api.admin().update_user(id, &changes).await;
        let outcome = match result {
            Ok(_) => {
                self.banner.success(success);
                self.load_users().await;
                Outcome::Done
            }
            Err(e) => {
                self.banner.error(error_text(&e, fallback));
                Outcome::Failed
            }
        };
        self.busy = None;
        outcome
    }
}
