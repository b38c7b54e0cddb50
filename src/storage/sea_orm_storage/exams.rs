use super::SeaOrmStorage;
use super::scoped::{delete_scoped, ensure_scoped, fetch_page, find_scoped, now, scoped};
use crate::entity::academic_years::Entity as AcademicYears;
use crate::entity::classes::Entity as Classes;
use crate::entity::exam_results::{self, Entity as ExamResults};
use crate::entity::exams::{self, Entity as Exams};
use crate::entity::students::Entity as Students;
use crate::entity::subjects::Entity as Subjects;
use crate::errors::{NazimError, Result};
use crate::models::TenantScope;
use crate::models::exams::{
    CreateExamRequest, Exam, ExamListParams, ExamListResponse, ExamResult, GradedResult,
    UpdateExamRequest,
};
use crate::storage::ExamStorage;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, QueryFilter, QueryOrder, QueryTrait, Set, TransactionTrait,
};
use std::collections::HashMap;

/// 总分必须为正，及格线在 0..=总分
fn check_marks(total_marks: f64, pass_marks: f64) -> Result<()> {
    if total_marks.is_nan() || total_marks <= 0.0 {
        return Err(NazimError::validation("Total marks must be greater than 0"));
    }
    if !(0.0..=total_marks).contains(&pass_marks) {
        return Err(NazimError::validation(
            "Pass marks must be between 0 and total marks",
        ));
    }
    Ok(())
}

impl SeaOrmStorage {
    async fn check_exam_links(
        &self,
        scope: &TenantScope,
        academic_year_id: Option<i64>,
        class_id: Option<i64>,
        subject_id: Option<i64>,
    ) -> Result<()> {
        if let Some(id) = academic_year_id {
            ensure_scoped::<AcademicYears, _>(&self.db, scope, id, "Academic year").await?;
        }
        if let Some(id) = class_id {
            ensure_scoped::<Classes, _>(&self.db, scope, id, "Class").await?;
        }
        if let Some(id) = subject_id {
            ensure_scoped::<Subjects, _>(&self.db, scope, id, "Subject").await?;
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ExamStorage for SeaOrmStorage {
    async fn list_exams(
        &self,
        scope: &TenantScope,
        params: &ExamListParams,
    ) -> Result<ExamListResponse> {
        let select = scoped::<Exams>(scope)
            .apply_if(params.class_id, |q, id| q.filter(exams::Column::ClassId.eq(id)))
            .apply_if(params.subject_id, |q, id| {
                q.filter(exams::Column::SubjectId.eq(id))
            })
            .apply_if(params.exam_type, |q, t| {
                q.filter(exams::Column::ExamType.eq(t.as_str()))
            })
            .apply_if(params.academic_year_id, |q, id| {
                q.filter(exams::Column::AcademicYearId.eq(id))
            })
            .order_by_desc(exams::Column::ExamDate)
            .order_by_desc(exams::Column::Id);

        fetch_page(select, &self.db, &params.pagination, |m| m.into_exam()).await
    }

    async fn get_exam(&self, scope: &TenantScope, id: i64) -> Result<Option<Exam>> {
        let result = find_scoped::<Exams, _>(&self.db, scope, id).await?;
        Ok(result.map(|m| m.into_exam()))
    }

    async fn create_exam(&self, scope: &TenantScope, req: CreateExamRequest) -> Result<Exam> {
        check_marks(req.total_marks, req.pass_marks)?;
        self.check_exam_links(
            scope,
            req.academic_year_id,
            Some(req.class_id),
            Some(req.subject_id),
        )
        .await?;

        let now = now();
        let model = exams::ActiveModel {
            organization_id: Set(scope.organization_id),
            school_id: Set(scope.school_id),
            academic_year_id: Set(req.academic_year_id),
            class_id: Set(req.class_id),
            subject_id: Set(req.subject_id),
            name: Set(req.name),
            exam_type: Set(req.exam_type.to_string()),
            exam_date: Set(req.exam_date),
            total_marks: Set(req.total_marks),
            pass_marks: Set(req.pass_marks),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("创建考试失败: {e}")))?;

        Ok(result.into_exam())
    }

    async fn update_exam(
        &self,
        scope: &TenantScope,
        id: i64,
        req: UpdateExamRequest,
    ) -> Result<Option<Exam>> {
        let Some(existing) = find_scoped::<Exams, _>(&self.db, scope, id).await? else {
            return Ok(None);
        };
        check_marks(
            req.total_marks.unwrap_or(existing.total_marks),
            req.pass_marks.unwrap_or(existing.pass_marks),
        )?;
        self.check_exam_links(scope, req.academic_year_id, req.class_id, req.subject_id)
            .await?;

        let mut model = exams::ActiveModel {
            id: Set(id),
            updated_at: Set(now()),
            ..Default::default()
        };
        if let Some(academic_year_id) = req.academic_year_id {
            model.academic_year_id = Set(Some(academic_year_id));
        }
        if let Some(class_id) = req.class_id {
            model.class_id = Set(class_id);
        }
        if let Some(subject_id) = req.subject_id {
            model.subject_id = Set(subject_id);
        }
        if let Some(name) = req.name {
            model.name = Set(name);
        }
        if let Some(exam_type) = req.exam_type {
            model.exam_type = Set(exam_type.to_string());
        }
        if let Some(exam_date) = req.exam_date {
            model.exam_date = Set(Some(exam_date));
        }
        if let Some(total_marks) = req.total_marks {
            model.total_marks = Set(total_marks);
        }
        if let Some(pass_marks) = req.pass_marks {
            model.pass_marks = Set(pass_marks);
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("更新考试失败: {e}")))?;

        Ok(Some(result.into_exam()))
    }

    async fn delete_exam(&self, scope: &TenantScope, id: i64) -> Result<bool> {
        delete_scoped::<Exams, _>(&self.db, scope, id).await
    }

    async fn save_exam_results(
        &self,
        scope: &TenantScope,
        exam_id: i64,
        results: Vec<GradedResult>,
    ) -> Result<Vec<ExamResult>> {
        ensure_scoped::<Exams, _>(&self.db, scope, exam_id, "Exam").await?;
        for result in &results {
            ensure_scoped::<Students, _>(&self.db, scope, result.student_id, "Student").await?;
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| NazimError::database_operation(format!("开启事务失败: {e}")))?;

        let existing: HashMap<i64, i64> = scoped::<ExamResults>(scope)
            .filter(exam_results::Column::ExamId.eq(exam_id))
            .all(&txn)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询成绩失败: {e}")))?
            .into_iter()
            .map(|r| (r.student_id, r.id))
            .collect();

        let now = now();
        let mut saved = Vec::with_capacity(results.len());
        for result in results {
            let model = match existing.get(&result.student_id) {
                Some(&id) => {
                    exam_results::ActiveModel {
                        id: Set(id),
                        marks_obtained: Set(result.marks_obtained),
                        percentage: Set(result.percentage),
                        grade: Set(result.grade),
                        is_pass: Set(result.is_pass),
                        remarks: Set(result.remarks),
                        updated_at: Set(now),
                        ..Default::default()
                    }
                    .update(&txn)
                    .await
                }
                None => {
                    exam_results::ActiveModel {
                        organization_id: Set(scope.organization_id),
                        school_id: Set(scope.school_id),
                        exam_id: Set(exam_id),
                        student_id: Set(result.student_id),
                        marks_obtained: Set(result.marks_obtained),
                        percentage: Set(result.percentage),
                        grade: Set(result.grade),
                        is_pass: Set(result.is_pass),
                        remarks: Set(result.remarks),
                        created_at: Set(now),
                        updated_at: Set(now),
                        ..Default::default()
                    }
                    .insert(&txn)
                    .await
                }
            }
            .map_err(|e| NazimError::database_operation(format!("保存成绩失败: {e}")))?;

            saved.push(model.into_result());
        }

        txn.commit()
            .await
            .map_err(|e| NazimError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(saved)
    }

    async fn list_exam_results(
        &self,
        scope: &TenantScope,
        exam_id: i64,
    ) -> Result<Vec<ExamResult>> {
        let results = scoped::<ExamResults>(scope)
            .filter(exam_results::Column::ExamId.eq(exam_id))
            .order_by_desc(exam_results::Column::MarksObtained)
            .all(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询成绩失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_result()).collect())
    }

    async fn list_student_results(
        &self,
        scope: &TenantScope,
        student_id: i64,
        academic_year_id: Option<i64>,
    ) -> Result<Vec<(ExamResult, Exam)>> {
        let results = scoped::<ExamResults>(scope)
            .filter(exam_results::Column::StudentId.eq(student_id))
            .all(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询成绩失败: {e}")))?;

        let exam_ids: Vec<i64> = results.iter().map(|r| r.exam_id).collect();
        let mut exams: HashMap<i64, Exam> = scoped::<Exams>(scope)
            .filter(exams::Column::Id.is_in(exam_ids))
            .apply_if(academic_year_id, |q, id| {
                q.filter(exams::Column::AcademicYearId.eq(id))
            })
            .all(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询考试失败: {e}")))?
            .into_iter()
            .map(|m| (m.id, m.into_exam()))
            .collect();

        // 已删除或不在该学年的考试不计入
        let mut rows: Vec<(ExamResult, Exam)> = results
            .into_iter()
            .filter_map(|r| exams.remove(&r.exam_id).map(|exam| (r.into_result(), exam)))
            .collect();
        rows.sort_by_key(|(_, exam)| (exam.exam_date, exam.id));
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::academic::CreateSubjectRequest;
    use crate::models::exams::ExamType;
    use crate::storage::AcademicStorage;
    use crate::storage::sea_orm_storage::test_support::{seed_class, seed_school, seed_student};

    async fn seed_exam(storage: &SeaOrmStorage, scope: &TenantScope, class_id: i64) -> Exam {
        let subject = storage
            .create_subject(
                scope,
                CreateSubjectRequest {
                    name: "English".to_string(),
                    code: "ENG".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap();
        storage
            .create_exam(
                scope,
                CreateExamRequest {
                    academic_year_id: None,
                    class_id,
                    subject_id: subject.id,
                    name: "Midterm".to_string(),
                    exam_type: ExamType::Midterm,
                    exam_date: Some("2026-05-10".parse().unwrap()),
                    total_marks: 100.0,
                    pass_marks: 40.0,
                },
            )
            .await
            .unwrap()
    }

    fn graded(student_id: i64, marks: f64) -> GradedResult {
        GradedResult {
            student_id,
            marks_obtained: marks,
            percentage: marks,
            grade: "B".to_string(),
            is_pass: marks >= 40.0,
            remarks: None,
        }
    }

    #[test]
    fn test_check_marks() {
        assert!(check_marks(100.0, 40.0).is_ok());
        assert!(check_marks(100.0, 100.0).is_ok());
        assert!(check_marks(0.0, 0.0).is_err());
        assert!(check_marks(50.0, 60.0).is_err());
        assert!(check_marks(50.0, -1.0).is_err());
    }

    #[tokio::test]
    async fn test_save_results_upserts_per_student() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let scope = seed_school(&storage, "exams").await;
        let class_id = seed_class(&storage, &scope, "Grade 8").await;
        let student = seed_student(&storage, &scope, "X-1", Some(class_id)).await;
        let exam = seed_exam(&storage, &scope, class_id).await;

        storage
            .save_exam_results(&scope, exam.id, vec![graded(student.id, 55.0)])
            .await
            .unwrap();
        storage
            .save_exam_results(&scope, exam.id, vec![graded(student.id, 72.0)])
            .await
            .unwrap();

        let results = storage.list_exam_results(&scope, exam.id).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].marks_obtained, 72.0);

        let card = storage
            .list_student_results(&scope, student.id, None)
            .await
            .unwrap();
        assert_eq!(card.len(), 1);
        assert_eq!(card[0].1.id, exam.id);

        // 删除考试后成绩单不再包含
        storage.delete_exam(&scope, exam.id).await.unwrap();
        assert!(
            storage
                .list_student_results(&scope, student.id, None)
                .await
                .unwrap()
                .is_empty()
        );
    }
}
