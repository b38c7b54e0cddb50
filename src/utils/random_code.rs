use chrono::NaiveDate;
use rand::Rng;

const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// 生成指定长度的随机码（去掉易混淆的 0/O/1/I）
pub fn random_code(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// 捐赠流水号 `DON-<yyyymmdd>-<6 位随机码>`
pub fn donation_transaction_id(date: NaiveDate) -> String {
    format!("DON-{}-{}", date.format("%Y%m%d"), random_code(6))
}

/// 初始管理员密码：满足密码策略（大小写字母与数字）
pub fn initial_password() -> String {
    let mut rng = rand::rng();
    let lower = (b'a' + rng.random_range(0..26u8)) as char;
    let upper = (b'A' + rng.random_range(0..26u8)) as char;
    let digit = (b'0' + rng.random_range(0..10u8)) as char;
    format!("{upper}{lower}{digit}{}", random_code(13))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validate::validate_password;

    #[test]
    fn test_random_code_alphabet() {
        let code = random_code(32);
        assert_eq!(code.len(), 32);
        assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_donation_transaction_id_format() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let id = donation_transaction_id(date);
        assert!(id.starts_with("DON-20240309-"));
        assert_eq!(id.len(), "DON-20240309-".len() + 6);
    }

    #[test]
    fn test_initial_password_meets_policy() {
        for _ in 0..20 {
            assert!(validate_password(&initial_password()).is_ok());
        }
    }
}
