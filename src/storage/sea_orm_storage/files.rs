//! 文件存储操作

use super::SeaOrmStorage;
use super::scoped::now;
use crate::entity::files::{ActiveModel, Column, Entity as Files};
use crate::errors::{NazimError, Result};
use crate::models::files::entities::{File, NewFile};
use crate::storage::FileStorage;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

#[async_trait::async_trait]
impl FileStorage for SeaOrmStorage {
    /// 创建文件记录
    async fn create_file(&self, file: NewFile) -> Result<File> {
        let model = ActiveModel {
            download_token: Set(file.download_token),
            organization_id: Set(file.organization_id),
            school_id: Set(file.school_id),
            original_name: Set(file.original_name),
            stored_name: Set(file.stored_name),
            file_size: Set(file.file_size),
            file_type: Set(file.file_type),
            user_id: Set(file.user_id),
            created_at: Set(now()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("上传文件记录失败: {e}")))?;

        Ok(result.into_file())
    }

    /// 通过下载凭证获取文件
    async fn get_file_by_token(&self, token: &str) -> Result<Option<File>> {
        let result = Files::find()
            .filter(Column::DownloadToken.eq(token))
            .one(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询文件失败: {e}")))?;

        Ok(result.map(|m| m.into_file()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::{seed_school, seed_user};

    #[tokio::test]
    async fn test_file_record_by_token() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let scope = seed_school(&storage, "files").await;
        let user_id = seed_user(&storage, "uploader", scope.organization_id).await;

        let file = storage
            .create_file(NewFile {
                download_token: "tok-123".to_string(),
                organization_id: scope.organization_id,
                school_id: Some(scope.school_id),
                original_name: "report.pdf".to_string(),
                stored_name: "abc.pdf".to_string(),
                file_size: 1024,
                file_type: "pdf".to_string(),
                user_id,
            })
            .await
            .unwrap();

        let found = storage.get_file_by_token("tok-123").await.unwrap().unwrap();
        assert_eq!(found.id, file.id);
        assert_eq!(found.stored_name, "abc.pdf");
        assert!(storage.get_file_by_token("missing").await.unwrap().is_none());
    }
}
