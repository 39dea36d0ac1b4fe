use super::{layout, Chrome};

pub fn login_page(chrome: &Chrome<'_>) -> String {
    let body = r#"<div class="card"><form method="post" action="/login">
<label for="username">Username</label><input id="username" name="username" required autofocus/>
<label for="password">Password</label><input id="password" name="password" type="password" required/>
<p><button type="submit">Log in</button></p>
</form><p>No account? <a href="/signup">Sign up</a></p></div>"#;
    layout("Log in", chrome, body)
}

pub fn signup_page(chrome: &Chrome<'_>) -> String {
    let body = r#"<div class="card"><form method="post" action="/signup">
<label for="username">Username</label><input id="username" name="username" required autofocus/>
<label for="password">Password</label><input id="password" name="password" type="password" required/>
<label for="role">Role</label><select id="role" name="role"><option value="readonly" selected>readonly</option><option value="admin">admin</option></select>
<p><button type="submit">Create account</button></p>
</form><p>Already registered? <a href="/login">Log in</a></p></div>"#;
    layout("Sign up", chrome, body)
}
