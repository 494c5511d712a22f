// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Facilities ---
        handlers::facilities::create_facility,
        handlers::facilities::list_facilities,
        handlers::facilities::get_facility,
        handlers::facilities::delete_facility,
        handlers::facilities::add_staff,
        handlers::facilities::remove_staff,
        handlers::facilities::list_staff,

        // --- Cleaning ---
        handlers::cleaning::get_assignments,
        handlers::cleaning::get_assignment,
        handlers::cleaning::create_assignment,
        handlers::cleaning::auto_assign,
        handlers::cleaning::set_status,
        handlers::cleaning::toggle_checklist_item,
        handlers::cleaning::attach_photo,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,

            // --- Facilities ---
            models::facility::Facility,
            models::facility::StaffMember,
            handlers::facilities::CreateFacilityPayload,
            handlers::facilities::AddStaffPayload,

            // --- Cleaning ---
            models::cleaning::AssignmentStatus,
            models::cleaning::ChecklistArea,
            models::cleaning::CleaningAssignment,
            models::cleaning::AssignmentSummary,
            models::cleaning::ChecklistItem,
            models::cleaning::AreaProgress,
            models::cleaning::AssignmentDetail,
            models::cleaning::CreatedAssignment,
            models::cleaning::AutoAssignResult,
            handlers::cleaning::CreateAssignmentPayload,
            handlers::cleaning::StatusPayload,
            handlers::cleaning::AttachPhotoPayload,
        )
    ),
    tags(
        (name = "Facilities", description = "Facilities and their cleaning staff"),
        (name = "Cleaning", description = "Cleaning assignments, rotation and checklists")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
