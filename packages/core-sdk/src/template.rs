/**
 * \brief 单遍占位符填充。
 * \details 仅替换 `{name}`（name 由小写字母与下划线组成且出现在 vars 中）；
 *          其余花括号原样输出，已替换的值不会被再次扫描。
 */
pub fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + 64);
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let name_len = tail
            .bytes()
            .take_while(|b| b.is_ascii_lowercase() || *b == b'_')
            .count();
        if name_len > 0 && tail.as_bytes().get(name_len) == Some(&b'}') {
            let name = &tail[..name_len];
            if let Some((_, value)) = vars.iter().find(|(key, _)| *key == name) {
                out.push_str(value);
                rest = &tail[name_len + 1..];
                continue;
            }
        }
        out.push('{');
        rest = tail;
    }
    out.push_str(rest);
    out
}
