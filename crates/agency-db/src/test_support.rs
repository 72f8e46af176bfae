//! Shared test utilities for agency-db unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use std::str::FromStr;

    use agency_config::PlanningConfig;
    use agency_core::enums::Role;
    use agency_core::identity::AuthContext;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    use crate::AgencyDb;
    use crate::repos::project::NewProject;
    use crate::repos::task::NewTask;
    use crate::service::AgencyService;

    /// Create an in-memory `AgencyService` with default planning settings.
    pub async fn test_service() -> AgencyService {
        let db = AgencyDb::open_local(":memory:").await.unwrap();
        AgencyService::from_db(db, PlanningConfig::default())
    }

    /// One organization with an admin, a manager, and a member.
    pub struct Studio {
        pub svc: AgencyService,
        pub admin: AuthContext,
        pub manager: AuthContext,
        pub member: AuthContext,
    }

    /// Bootstrap an organization and return contexts for each role.
    pub async fn studio() -> Studio {
        let svc = test_service().await;
        let (_, admin) = svc
            .create_organization("Brightline", "Ada Admin", "ada@brightline.test")
            .await
            .unwrap();
        let admin = svc.auth_context(&admin.id).await.unwrap();
        let manager = svc
            .create_user(&admin, "Max Manager", "max@brightline.test", Role::Manager, None)
            .await
            .unwrap();
        let member = svc
            .create_user(&admin, "Mia Member", "mia@brightline.test", Role::Member, None)
            .await
            .unwrap();
        let manager = svc.auth_context(&manager.id).await.unwrap();
        let member = svc.auth_context(&member.id).await.unwrap();
        Studio {
            svc,
            admin,
            manager,
            member,
        }
    }

    /// Second, unrelated organization on the same database.
    pub async fn other_org(svc: &AgencyService) -> AuthContext {
        let (_, admin) = svc
            .create_organization("Rival", "Rex Rival", "rex@rival.test")
            .await
            .unwrap();
        svc.auth_context(&admin.id).await.unwrap()
    }

    pub async fn project(svc: &AgencyService, ctx: &AuthContext, name: &str) -> String {
        svc.create_project(ctx, NewProject::named(name))
            .await
            .unwrap()
            .id
    }

    pub async fn task(svc: &AgencyService, ctx: &AuthContext, project_id: &str, title: &str) -> String {
        svc.create_task(ctx, project_id, NewTask::titled(title))
            .await
            .unwrap()
            .id
    }

    pub fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }
}
