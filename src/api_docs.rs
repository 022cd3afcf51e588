use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::entities::sea_orm_active_enums::{ExamType, Grade, NoticePriority, TargetAudience};
use crate::routes::{
    auth::{self, dto as auth_dto},
    classes::{self, dto as class_dto},
    combinations::{self, dto as combination_dto},
    common::{ClassInfo, StudentInfo, SubjectInfo},
    health,
    notices::{self, dto as notice_dto},
    response::{ErrorResponse, MessageResponse},
    results::{self, dto as result_dto},
    students::{self, dto as student_dto},
    subjects::{self, dto as subject_dto},
};
use crate::services::{
    notice_service::{AudienceCount, NoticeStats, PriorityCount},
    result_service::{
        BulkItemError, BulkSummary, GradeCount, ResultStats, SubjectAverage, TopPerformer,
    },
    student_service::{ClassCount, StudentStats, YearCount},
    subject_service::DeletedRecords,
    validation::{ResultInput, ResultUpdate},
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "School Records API",
        description = "Classes, subjects, students, exam results and notices of a school"
    ),
    paths(
        health::route::health,
        auth::route::login,
        auth::route::change_password,
        classes::route::get_all_classes,
        classes::route::get_class,
        classes::route::create_class,
        classes::route::update_class,
        classes::route::delete_class,
        subjects::route::get_all_subjects,
        subjects::route::get_subject,
        subjects::route::create_subject,
        subjects::route::update_subject,
        subjects::route::delete_subject,
        combinations::route::get_all_combinations,
        combinations::route::get_combinations_by_class,
        combinations::route::get_combinations_by_subject,
        combinations::route::get_combination,
        combinations::route::create_combination,
        combinations::route::create_bulk_combinations,
        combinations::route::update_combination,
        combinations::route::toggle_combination,
        combinations::route::delete_combination,
        students::route::get_all_students,
        students::route::get_student_stats,
        students::route::get_students_by_class,
        students::route::get_students_by_year,
        students::route::get_student,
        students::route::create_student,
        students::route::update_student,
        students::route::toggle_student,
        students::route::delete_student,
        results::route::get_all_results,
        results::route::get_result_stats,
        results::route::get_results_by_student,
        results::route::get_student_summary,
        results::route::get_results_by_class,
        results::route::get_results_by_subject,
        results::route::get_result,
        results::route::create_result,
        results::route::bulk_create_results,
        results::route::update_result,
        results::route::delete_result,
        results::route::bulk_delete_results,
        results::route::delete_all_results,
        notices::route::get_all_notices,
        notices::route::get_notice_stats,
        notices::route::get_active_notices,
        notices::route::get_notices_by_priority,
        notices::route::get_notice,
        notices::route::create_notice,
        notices::route::update_notice,
        notices::route::toggle_notice,
        notices::route::delete_notice,
    ),
    components(schemas(
        ExamType,
        Grade,
        NoticePriority,
        TargetAudience,
        ErrorResponse,
        MessageResponse,
        ClassInfo,
        SubjectInfo,
        StudentInfo,
        health::route::HealthResponse,
        auth_dto::LoginRequest,
        auth_dto::LoginData,
        auth_dto::ChangePasswordRequest,
        class_dto::ClassRequest,
        class_dto::ClassResponse,
        subject_dto::SubjectRequest,
        subject_dto::SubjectResponse,
        subject_dto::SubjectDeletedResponse,
        DeletedRecords,
        combination_dto::CombinationRequest,
        combination_dto::BulkCombinationRequest,
        combination_dto::CombinationResponse,
        combination_dto::BulkCombinationData,
        student_dto::StudentRequest,
        student_dto::StudentResponse,
        StudentStats,
        YearCount,
        ClassCount,
        ResultInput,
        ResultUpdate,
        result_dto::ResultResponse,
        result_dto::BulkResultRequest,
        result_dto::BulkResultData,
        result_dto::BulkDeleteRequest,
        result_dto::DeletedCount,
        result_dto::ExamSummaryResponse,
        result_dto::StudentSummaryResponse,
        BulkItemError,
        BulkSummary,
        ResultStats,
        GradeCount,
        SubjectAverage,
        TopPerformer,
        notice_dto::NoticeRequest,
        notice_dto::NoticeResponse,
        notice_dto::NoticeListResponse,
        NoticeStats,
        PriorityCount,
        AudienceCount,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Authentication", description = "Administrator login"),
        (name = "Classes", description = "Class management"),
        (name = "Subjects", description = "Subject management"),
        (name = "Combinations", description = "Subjects offered per class"),
        (name = "Students", description = "Student registry"),
        (name = "Results", description = "Exam results and statistics"),
        (name = "Notices", description = "Notice board"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
