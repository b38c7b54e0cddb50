use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::{BTreeMap, HashMap};

use super::StudentService;
use crate::models::ApiResponse;
use crate::models::academic::Class;
use crate::models::students::{CountBucket, Gender, Student, StudentStats, StudentStatus};
use crate::services::{error_response, tenant_scope};

/// 班级显示名：`名称 班组`
pub(crate) fn class_label(class: &Class) -> String {
    match class.section.as_deref().filter(|s| !s.is_empty()) {
        Some(section) => format!("{} {}", class.name, section),
        None => class.name.clone(),
    }
}

pub(crate) fn summarize_students(students: &[Student], classes: &[Class]) -> StudentStats {
    let labels: HashMap<i64, String> = classes.iter().map(|c| (c.id, class_label(c))).collect();

    // 所有状态与性别都列出，计数可以为 0
    let by_status = StudentStatus::ALL
        .iter()
        .map(|status| CountBucket {
            key: status.to_string(),
            count: students.iter().filter(|s| s.status == *status).count() as i64,
        })
        .collect();
    let by_gender = Gender::ALL
        .iter()
        .map(|gender| CountBucket {
            key: gender.to_string(),
            count: students.iter().filter(|s| s.gender == *gender).count() as i64,
        })
        .collect();

    let mut per_class: BTreeMap<String, i64> = BTreeMap::new();
    for student in students {
        let key = student
            .class_id
            .and_then(|id| labels.get(&id).cloned())
            .unwrap_or_else(|| "unassigned".to_string());
        *per_class.entry(key).or_default() += 1;
    }

    StudentStats {
        total: students.len() as i64,
        by_status,
        by_gender,
        by_class: per_class
            .into_iter()
            .map(|(key, count)| CountBucket { key, count })
            .collect(),
    }
}

pub async fn student_stats(
    service: &StudentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let scope = tenant_scope(request)?;
    let storage = service.get_storage(request)?;

    let students = match storage.list_all_students(&scope, None).await {
        Ok(students) => students,
        Err(e) => return Ok(error_response(&e)),
    };
    let classes = match storage.list_all_classes(&scope).await {
        Ok(classes) => classes,
        Err(e) => return Ok(error_response(&e)),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        summarize_students(&students, &classes),
        "Student statistics retrieved successfully",
    )))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Utc;

    pub(crate) fn student(id: i64, class_id: Option<i64>, gender: Gender) -> Student {
        Student {
            id,
            organization_id: 1,
            school_id: 1,
            class_id,
            admission_no: format!("ADM-{id}"),
            full_name: format!("Student {id}"),
            father_name: None,
            gender,
            date_of_birth: None,
            guardian_name: None,
            guardian_phone: None,
            address: None,
            admission_date: None,
            status: StudentStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub(crate) fn class(id: i64, name: &str, section: Option<&str>) -> Class {
        Class {
            id,
            organization_id: 1,
            school_id: 1,
            academic_year_id: None,
            name: name.to_string(),
            section: section.map(str::to_string),
            grade_level: None,
            class_teacher_id: None,
            room_id: None,
            capacity: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn count(buckets: &[CountBucket], key: &str) -> i64 {
        buckets
            .iter()
            .find(|b| b.key == key)
            .map(|b| b.count)
            .unwrap_or(-1)
    }

    #[test]
    fn test_summarize_students() {
        let mut graduated = student(3, None, Gender::Female);
        graduated.status = StudentStatus::Graduated;
        let students = vec![
            student(1, Some(10), Gender::Male),
            student(2, Some(10), Gender::Female),
            graduated,
        ];
        let classes = vec![class(10, "Grade 5", Some("A"))];

        let stats = summarize_students(&students, &classes);
        assert_eq!(stats.total, 3);
        assert_eq!(count(&stats.by_status, "active"), 2);
        assert_eq!(count(&stats.by_status, "graduated"), 1);
        assert_eq!(count(&stats.by_status, "suspended"), 0);
        assert_eq!(count(&stats.by_gender, "female"), 2);
        assert_eq!(count(&stats.by_gender, "other"), 0);
        assert_eq!(count(&stats.by_class, "Grade 5 A"), 2);
        assert_eq!(count(&stats.by_class, "unassigned"), 1);
    }

    #[test]
    fn test_summarize_empty() {
        let stats = summarize_students(&[], &[]);
        assert_eq!(stats.total, 0);
        assert!(stats.by_class.is_empty());
        assert_eq!(stats.by_status.len(), StudentStatus::ALL.len());
    }
}
