use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 分页查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "pagination.ts")]
pub struct PaginationQuery {
    #[serde(
        default = "default_page",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub page: i64,
    #[serde(
        default = "default_size",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub size: i64,
}

// 分页响应信息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "pagination.ts")]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

// 分页列表响应
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "pagination.ts")]
pub struct PaginatedResponse<T: TS> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
}

// 自定义反序列化函数，支持字符串到i64的转换
fn deserialize_string_to_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{Error, Unexpected, Visitor};
    use std::fmt;

    struct I64Visitor;

    impl<'de> Visitor<'de> for I64Visitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer or a string containing an integer")
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            if value <= i64::MAX as u64 {
                Ok(value as i64)
            } else {
                Err(Error::invalid_value(Unexpected::Unsigned(value), &self))
            }
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            value
                .parse()
                .map_err(|_| Error::invalid_value(Unexpected::Str(value), &self))
        }
    }

    deserializer.deserialize_any(I64Visitor)
}

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    10
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self { page: 1, size: 10 }
    }
}

/// 页大小上限
const MAX_PAGE_SIZE: i64 = 100;
/// 页码上限，保证 page * size 不超过 i64
const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_SIZE;

impl PaginationQuery {
    /// 规范化页码与页大小：page 限制在 1..=MAX_PAGE，size 限制在 1..=100
    pub fn normalized(&self) -> (u64, u64) {
        (
            self.page.clamp(1, MAX_PAGE) as u64,
            self.size.clamp(1, MAX_PAGE_SIZE) as u64,
        )
    }
}

impl PaginationInfo {
    pub fn new(page: u64, page_size: u64, total: u64, total_pages: u64) -> Self {
        Self {
            page: page as i64,
            page_size: page_size as i64,
            total: total as i64,
            total_pages: total_pages as i64,
        }
    }

    /// 内存分页（报表类接口先聚合后分页）
    pub fn slice<T>(items: Vec<T>, query: &PaginationQuery) -> PaginatedResponse<T>
    where
        T: ts_rs::TS,
    {
        let (page, size) = query.normalized();
        let total = items.len() as u64;
        let total_pages = total.div_ceil(size);
        let offset = usize::try_from((page - 1).saturating_mul(size)).unwrap_or(usize::MAX);
        let items = items
            .into_iter()
            .skip(offset)
            .take(size as usize)
            .collect();
        PaginatedResponse {
            items,
            pagination: Self::new(page, size, total, total_pages),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Params {
        #[serde(flatten)]
        pagination: PaginationQuery,
    }

    #[test]
    fn test_string_page_params() {
        let params: Params = serde_json::from_str(r#"{"page": "3", "size": "25"}"#).unwrap();
        assert_eq!(params.pagination.page, 3);
        assert_eq!(params.pagination.size, 25);
    }

    #[test]
    fn test_defaults_and_clamp() {
        let params: Params = serde_json::from_str("{}").unwrap();
        assert_eq!(params.pagination.normalized(), (1, 10));

        let query = PaginationQuery { page: -4, size: 1000 };
        assert_eq!(query.normalized(), (1, 100));
    }

    #[test]
    fn test_in_memory_slice() {
        let query = PaginationQuery { page: 2, size: 2 };
        let page = PaginationInfo::slice(vec![1, 2, 3, 4, 5], &query);
        assert_eq!(page.items, vec![3, 4]);
        assert_eq!(page.pagination.total, 5);
        assert_eq!(page.pagination.total_pages, 3);

        let beyond = PaginationInfo::slice(vec![1, 2], &PaginationQuery { page: 9, size: 10 });
        assert!(beyond.items.is_empty());
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let query = PaginationQuery {
            page: i64::MAX,
            size: 100,
        };
        let (page, size) = query.normalized();
        assert_eq!(page, (i64::MAX / 100) as u64);
        assert!(page.checked_mul(size).is_some_and(|offset| offset <= i64::MAX as u64));

        let result = PaginationInfo::slice(vec![1, 2, 3], &query);
        assert!(result.items.is_empty());
        assert_eq!(result.pagination.total, 3);
        assert_eq!(result.pagination.total_pages, 1);
    }
}
