use super::SeaOrmStorage;
use super::scoped::{
    delete_scoped, ensure_scoped, fetch_page, find_scoped, now, scoped, search_condition,
};
use crate::entity::classes::Entity as Classes;
use crate::entity::students::{ActiveModel, Column, Entity as Students};
use crate::errors::{NazimError, Result};
use crate::models::TenantScope;
use crate::models::students::{
    CreateStudentRequest, Student, StudentListParams, StudentListResponse, StudentStatus,
    UpdateStudentRequest,
};
use crate::storage::StudentStorage;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QueryTrait, Set, TransactionTrait,
};

/// 学校内学号是否已被占用
async fn admission_no_taken<C: ConnectionTrait>(
    db: &C,
    scope: &TenantScope,
    admission_no: &str,
    exclude_id: Option<i64>,
) -> Result<bool> {
    let count = scoped::<Students>(scope)
        .filter(Column::AdmissionNo.eq(admission_no))
        .apply_if(exclude_id, |q, id| q.filter(Column::Id.ne(id)))
        .count(db)
        .await
        .map_err(|e| NazimError::database_operation(format!("查询学生失败: {e}")))?;
    Ok(count > 0)
}

async fn insert_student<C: ConnectionTrait>(
    db: &C,
    scope: &TenantScope,
    req: CreateStudentRequest,
) -> Result<Student> {
    if let Some(class_id) = req.class_id {
        ensure_scoped::<Classes, _>(db, scope, class_id, "Class").await?;
    }
    if admission_no_taken(db, scope, &req.admission_no, None).await? {
        return Err(NazimError::conflict(format!(
            "Admission number '{}' already exists",
            req.admission_no
        )));
    }

    let now = now();
    let model = ActiveModel {
        organization_id: Set(scope.organization_id),
        school_id: Set(scope.school_id),
        class_id: Set(req.class_id),
        admission_no: Set(req.admission_no),
        full_name: Set(req.full_name),
        father_name: Set(req.father_name),
        gender: Set(req.gender.to_string()),
        date_of_birth: Set(req.date_of_birth),
        guardian_name: Set(req.guardian_name),
        guardian_phone: Set(req.guardian_phone),
        address: Set(req.address),
        admission_date: Set(req.admission_date),
        status: Set(req.status.unwrap_or(StudentStatus::Active).to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let result = model
        .insert(db)
        .await
        .map_err(|e| NazimError::database_operation(format!("创建学生失败: {e}")))?;

    Ok(result.into_student())
}

#[async_trait::async_trait]
impl StudentStorage for SeaOrmStorage {
    async fn list_students(
        &self,
        scope: &TenantScope,
        params: &StudentListParams,
    ) -> Result<StudentListResponse> {
        let select = scoped::<Students>(scope)
            .apply_if(
                search_condition(
                    params.search.as_deref(),
                    &[
                        Column::FullName,
                        Column::AdmissionNo,
                        Column::FatherName,
                        Column::GuardianPhone,
                    ],
                ),
                |q, cond| q.filter(cond),
            )
            .apply_if(params.class_id, |q, id| q.filter(Column::ClassId.eq(id)))
            .apply_if(params.status, |q, status| {
                q.filter(Column::Status.eq(status.as_str()))
            })
            .apply_if(params.gender, |q, gender| {
                q.filter(Column::Gender.eq(gender.as_str()))
            })
            .order_by_asc(Column::FullName);

        fetch_page(select, &self.db, &params.pagination, |m| m.into_student()).await
    }

    async fn list_all_students(
        &self,
        scope: &TenantScope,
        class_id: Option<i64>,
    ) -> Result<Vec<Student>> {
        let students = scoped::<Students>(scope)
            .apply_if(class_id, |q, id| q.filter(Column::ClassId.eq(id)))
            .order_by_asc(Column::FullName)
            .all(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询学生列表失败: {e}")))?;

        Ok(students.into_iter().map(|m| m.into_student()).collect())
    }

    async fn get_student(&self, scope: &TenantScope, id: i64) -> Result<Option<Student>> {
        let result = find_scoped::<Students, _>(&self.db, scope, id).await?;
        Ok(result.map(|m| m.into_student()))
    }

    async fn create_student(
        &self,
        scope: &TenantScope,
        req: CreateStudentRequest,
    ) -> Result<Student> {
        insert_student(&self.db, scope, req).await
    }

    async fn import_students(
        &self,
        scope: &TenantScope,
        rows: Vec<CreateStudentRequest>,
    ) -> Result<Vec<Student>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| NazimError::database_operation(format!("开启事务失败: {e}")))?;

        let mut created = Vec::with_capacity(rows.len());
        for row in rows {
            // 任一行失败整批回滚，txn 在 drop 时自动回滚
            created.push(insert_student(&txn, scope, row).await?);
        }

        txn.commit()
            .await
            .map_err(|e| NazimError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(created)
    }

    async fn update_student(
        &self,
        scope: &TenantScope,
        id: i64,
        req: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        if find_scoped::<Students, _>(&self.db, scope, id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now()),
            ..Default::default()
        };

        if let Some(class_id) = req.class_id {
            ensure_scoped::<Classes, _>(&self.db, scope, class_id, "Class").await?;
            model.class_id = Set(Some(class_id));
        }
        if let Some(admission_no) = req.admission_no {
            if admission_no_taken(&self.db, scope, &admission_no, Some(id)).await? {
                return Err(NazimError::conflict(format!(
                    "Admission number '{admission_no}' already exists"
                )));
            }
            model.admission_no = Set(admission_no);
        }
        if let Some(full_name) = req.full_name {
            model.full_name = Set(full_name);
        }
        if let Some(father_name) = req.father_name {
            model.father_name = Set(Some(father_name));
        }
        if let Some(gender) = req.gender {
            model.gender = Set(gender.to_string());
        }
        if let Some(date_of_birth) = req.date_of_birth {
            model.date_of_birth = Set(Some(date_of_birth));
        }
        if let Some(guardian_name) = req.guardian_name {
            model.guardian_name = Set(Some(guardian_name));
        }
        if let Some(guardian_phone) = req.guardian_phone {
            model.guardian_phone = Set(Some(guardian_phone));
        }
        if let Some(address) = req.address {
            model.address = Set(Some(address));
        }
        if let Some(admission_date) = req.admission_date {
            model.admission_date = Set(Some(admission_date));
        }
        if let Some(status) = req.status {
            model.status = Set(status.to_string());
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("更新学生失败: {e}")))?;

        Ok(Some(result.into_student()))
    }

    async fn delete_student(&self, scope: &TenantScope, id: i64) -> Result<bool> {
        delete_scoped::<Students, _>(&self.db, scope, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::students::Gender;
    use crate::storage::sea_orm_storage::test_support::{
        seed_class, seed_school, seed_student, student_request,
    };

    #[tokio::test]
    async fn test_admission_no_unique_per_school() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let scope = seed_school(&storage, "north").await;
        let other = seed_school(&storage, "south").await;

        seed_student(&storage, &scope, "A-1", None).await;
        let err = storage
            .create_student(&scope, student_request("A-1", None))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E014");

        // 另一所学校不冲突
        seed_student(&storage, &other, "A-1", None).await;
    }

    #[tokio::test]
    async fn test_student_filters_and_soft_delete() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let scope = seed_school(&storage, "east").await;
        let class_id = seed_class(&storage, &scope, "Grade 1").await;

        let first = seed_student(&storage, &scope, "E-1", Some(class_id)).await;
        let mut req = student_request("E-2", None);
        req.gender = Gender::Female;
        storage.create_student(&scope, req).await.unwrap();

        let params = StudentListParams {
            class_id: Some(class_id),
            ..Default::default()
        };
        let in_class = storage.list_students(&scope, &params).await.unwrap();
        assert_eq!(in_class.pagination.total, 1);
        assert_eq!(in_class.items[0].id, first.id);

        let params = StudentListParams {
            gender: Some(Gender::Female),
            ..Default::default()
        };
        assert_eq!(storage.list_students(&scope, &params).await.unwrap().pagination.total, 1);

        let params = StudentListParams {
            search: Some("E-1".to_string()),
            ..Default::default()
        };
        assert_eq!(storage.list_students(&scope, &params).await.unwrap().pagination.total, 1);

        assert!(storage.delete_student(&scope, first.id).await.unwrap());
        assert!(storage.get_student(&scope, first.id).await.unwrap().is_none());
        assert!(!storage.delete_student(&scope, first.id).await.unwrap());
        assert_eq!(storage.list_all_students(&scope, None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_student_class_must_be_in_scope() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let scope = seed_school(&storage, "west").await;
        let other = seed_school(&storage, "far").await;
        let foreign_class = seed_class(&storage, &other, "Other").await;

        let err = storage
            .create_student(&scope, student_request("W-1", Some(foreign_class)))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E007");
    }

    #[tokio::test]
    async fn test_import_is_all_or_nothing() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let scope = seed_school(&storage, "bulk").await;

        let err = storage
            .import_students(
                &scope,
                vec![student_request("B-1", None), student_request("B-1", None)],
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E014");
        assert!(storage.list_all_students(&scope, None).await.unwrap().is_empty());

        let created = storage
            .import_students(
                &scope,
                vec![student_request("B-1", None), student_request("B-2", None)],
            )
            .await
            .unwrap();
        assert_eq!(created.len(), 2);
    }
}
