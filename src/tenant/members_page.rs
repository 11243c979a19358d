//! The members page where admins see who has access and add sales staff.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::{PasswordHash, UserID, ValidatedPassword, parse_email},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, loading_spinner,
    },
    navigation::NavBar,
    tenant::{Company, Role, Viewer, add_member, get_company, get_viewer},
};

/// The state needed for the members page and endpoint.
#[derive(Debug, Clone)]
pub struct MembersState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for MembersState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A row of the members table.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub email: String,
    pub role: Role,
    pub company_name: String,
}

/// List the members `viewer` may see: everyone for a super admin, otherwise the
/// viewer's own company.
pub fn list_members(viewer: &Viewer, connection: &Connection) -> Result<Vec<Member>, Error> {
    let company_id = match viewer.role {
        Role::SuperAdmin => None,
        Role::Admin | Role::User => Some(viewer.company_id.as_i64()),
    };

    connection
        .prepare(
            "SELECT user.email, profiles.role, company.name
            FROM user
            INNER JOIN profiles ON profiles.id = user.id
            INNER JOIN company_users ON company_users.user_id = user.id
            INNER JOIN company ON company.id = company_users.company_id
            WHERE (:company_id IS NULL OR company.id = :company_id)
            ORDER BY company.name, user.email",
        )?
        .query_map(&[(":company_id", &company_id)], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?
        .map(|row| -> Result<Member, Error> {
            let (email, raw_role, company_name) = row?;
            Ok(Member {
                email,
                role: raw_role.parse()?,
                company_name,
            })
        })
        .collect()
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "Staf",
        Role::Admin => "Admin",
        Role::SuperAdmin => "Super Admin",
    }
}

fn add_member_form() -> Markup {
    html! {
        form
            hx-post=(endpoints::MEMBERS_API)
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="w-full space-y-4"
        {
            div
            {
                label for="email" class=(FORM_LABEL_STYLE) { "Email" }
                input
                    type="email"
                    name="email"
                    id="email"
                    placeholder="sales@dealer.id"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required;
            }

            div
            {
                label for="password" class=(FORM_LABEL_STYLE) { "Password awal" }
                input
                    type="password"
                    name="password"
                    id="password"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required;
            }

            button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator" { (loading_spinner()) }
                "Tambah Anggota"
            }
        }
    }
}

fn members_view(viewer: &Viewer, company: &Company, members: &[Member]) -> Markup {
    let nav_bar = NavBar::new(endpoints::MEMBERS_VIEW, viewer.role).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full max-w-3xl space-y-6"
            {
                h1 class="text-xl font-bold" { "Anggota " (company.name) }

                div class="max-w-md" { (add_member_form()) }

                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Email" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Peran" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Perusahaan" }
                        }
                    }

                    tbody
                    {
                        @for member in members {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td class=(TABLE_CELL_STYLE) { (member.email) }
                                td class=(TABLE_CELL_STYLE) { (role_label(member.role)) }
                                td class=(TABLE_CELL_STYLE) { (member.company_name) }
                            }
                        }
                    }
                }
            }
        }
    };

    base("Anggota", &[], &content)
}

/// Display the members of the viewer's company, or of every company for a super admin.
///
/// Plain users get a 404 page.
pub async fn get_members_page(
    State(state): State<MembersState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let viewer = get_viewer(user_id, &connection)?;

    if !viewer.role.can_manage_members() {
        return Err(Error::Forbidden);
    }

    let company = get_company(viewer.company_id, &connection)?;
    let members = list_members(&viewer, &connection)?;

    Ok(members_view(&viewer, &company, &members).into_response())
}

/// The form data for adding a member.
#[derive(Debug, Deserialize)]
pub struct MemberForm {
    pub email: String,
    pub password: String,
}

/// Add a staff account to the viewer's company.
pub async fn add_member_endpoint(
    State(state): State<MembersState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<MemberForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let result = get_viewer(user_id, &connection).and_then(|viewer| {
        if !viewer.role.can_manage_members() {
            return Err(Error::Forbidden);
        }

        let email = parse_email(&form.email)?;
        let password = ValidatedPassword::new(&form.password, &[email.as_str()])?;
        let password_hash = PasswordHash::new(password, PasswordHash::DEFAULT_COST)?;

        add_member(email, password_hash, viewer.company_id, &connection)
    });

    match result {
        Ok(member) => {
            tracing::info!("User {user_id} added member {}", member.user_id);
            (
                HxRedirect(endpoints::MEMBERS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("Could not add member: {error}");
            error.into_alert_response()
        }
    }
}
