//! 角色权限表
//!
//! 权限为 `资源.操作` 的组合，由 `RequirePermission` 中间件在路由上校验。

use super::entities::UserRole;

string_enum! {
    #[ts(export, export_to = "permission.ts")]
    pub enum Resource {
        Organizations => "organizations",
        Schools => "schools",
        Users => "users",
        Students => "students",
        Staff => "staff",
        Academic => "academic",
        Timetables => "timetables",
        Attendance => "attendance",
        Exams => "exams",
        Library => "library",
        Hostel => "hostel",
        Fees => "fees",
        Donations => "donations",
        Communications => "communications",
        Events => "events",
        Messages => "messages",
        Files => "files",
    }
}

string_enum! {
    #[ts(export, export_to = "permission.ts")]
    pub enum Action {
        Read => "read",
        Create => "create",
        Update => "update",
        Delete => "delete",
    }
}

impl UserRole {
    /// 判断角色是否拥有某资源上的某操作权限
    pub fn has_permission(&self, resource: Resource, action: Action) -> bool {
        use Action::*;
        use Resource::*;

        match self {
            UserRole::SuperAdmin => true,
            UserRole::Admin => resource != Organizations || action == Read,
            UserRole::Staff => match resource {
                Students | Attendance | Library | Hostel | Fees | Donations | Files | Messages => {
                    true
                }
                Organizations | Schools | Staff | Academic | Timetables | Exams
                | Communications | Events => action == Read,
                Users => false,
            },
            UserRole::Teacher => match resource {
                Attendance | Exams => action != Delete,
                Files => matches!(action, Read | Create),
                Messages => true,
                Organizations | Schools | Students | Academic | Timetables | Library
                | Communications | Events => action == Read,
                Users | Staff | Hostel | Fees | Donations => false,
            },
        }
    }

    /// 列出角色拥有的全部权限（`资源.操作`）
    pub fn permissions(&self) -> Vec<String> {
        Resource::ALL
            .iter()
            .flat_map(|resource| {
                Action::ALL
                    .iter()
                    .filter(|action| self.has_permission(*resource, **action))
                    .map(move |action| format!("{resource}.{action}"))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_super_admin_has_everything() {
        for resource in Resource::ALL {
            for action in Action::ALL {
                assert!(UserRole::SuperAdmin.has_permission(*resource, *action));
            }
        }
    }

    #[test]
    fn test_admin_cannot_manage_organizations() {
        assert!(UserRole::Admin.has_permission(Resource::Organizations, Action::Read));
        assert!(!UserRole::Admin.has_permission(Resource::Organizations, Action::Create));
        assert!(!UserRole::Admin.has_permission(Resource::Organizations, Action::Delete));
        assert!(UserRole::Admin.has_permission(Resource::Fees, Action::Delete));
        assert!(UserRole::Admin.has_permission(Resource::Users, Action::Create));
    }

    #[test]
    fn test_staff_permissions() {
        assert!(UserRole::Staff.has_permission(Resource::Fees, Action::Create));
        assert!(UserRole::Staff.has_permission(Resource::Academic, Action::Read));
        assert!(!UserRole::Staff.has_permission(Resource::Academic, Action::Update));
        assert!(!UserRole::Staff.has_permission(Resource::Users, Action::Read));
    }

    #[test]
    fn test_teacher_permissions() {
        assert!(UserRole::Teacher.has_permission(Resource::Attendance, Action::Create));
        assert!(UserRole::Teacher.has_permission(Resource::Exams, Action::Update));
        assert!(!UserRole::Teacher.has_permission(Resource::Exams, Action::Delete));
        assert!(!UserRole::Teacher.has_permission(Resource::Fees, Action::Read));
        assert!(UserRole::Teacher.has_permission(Resource::Files, Action::Create));
        assert!(!UserRole::Teacher.has_permission(Resource::Files, Action::Delete));
    }

    #[test]
    fn test_permission_listing() {
        let perms = UserRole::Teacher.permissions();
        assert!(perms.contains(&"students.read".to_string()));
        assert!(!perms.contains(&"students.create".to_string()));
    }
}
