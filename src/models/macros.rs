/// 定义以字符串形式存储的枚举
///
/// 自动生成：
/// - serde 序列化（使用给定的字符串值）
/// - TS 类型导出
/// - `ALL` 常量、`as_str()`、`Display`、`FromStr`
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            serde::Serialize,
            serde::Deserialize,
            ts_rs::TS,
        )]
        $(#[$meta])*
        $vis enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    _ => Err(format!("Invalid {}: {s}", stringify!($name))),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    string_enum! {
        enum Sample {
            First => "first",
            SecondOne => "second_one",
        }
    }

    #[test]
    fn test_string_enum_roundtrip() {
        assert_eq!(Sample::SecondOne.as_str(), "second_one");
        assert_eq!("first".parse::<Sample>(), Ok(Sample::First));
        assert!("third".parse::<Sample>().is_err());
        assert_eq!(Sample::ALL.len(), 2);
        assert_eq!(
            serde_json::to_string(&Sample::SecondOne).unwrap(),
            "\"second_one\""
        );
    }
}
