//! Minimal HTML views.
//!
//! The rendered markup is deliberately bare; only the form contract
//! matters (field names `password` and `_token`, the hidden token value,
//! and the flash error slot).

use std::fmt::Write;

use crate::domain::{escape_markup, UserListEntry};
use crate::services::EditView;

/// Render the user listing.
pub fn users_index(users: &[UserListEntry]) -> String {
    let mut rows = String::new();
    for user in users {
        let _ = write!(
            rows,
            "<tr><td>{}</td><td>{}</td><td>{}</td>\
             <td><a href=\"/users/edit/{}\">Edit</a> \
             <a href=\"/users/delete/{}\">Delete</a></td></tr>",
            user.id,
            escape_markup(&user.username),
            user.created_at.format("%Y-%m-%d %H:%M"),
            user.id,
            user.id,
        );
    }

    format!(
        "<!DOCTYPE html>\
         <html><head><title>Users</title></head><body>\
         <h1>Users</h1>\
         <table>\
         <tr><th>Id</th><th>Username</th><th>Created</th><th></th></tr>\
         {rows}\
         </table>\
         </body></html>"
    )
}

/// Render the password edit form for one user.
pub fn edit_form(view: &EditView) -> String {
    let username = escape_markup(&view.user.username);
    let error = view
        .flash_error
        .as_deref()
        .map(|message| format!("<p class=\"form-error\">{}</p>", escape_markup(message)))
        .unwrap_or_default();

    format!(
        "<!DOCTYPE html>\
         <html><head><title>Edit {username}</title></head><body>\
         <h1>Edit {username}</h1>\
         {error}\
         <form method=\"post\" action=\"/users/{id}\">\
         <input type=\"hidden\" name=\"_token\" value=\"{token}\">\
         <label>New password <input type=\"password\" name=\"password\"></label>\
         <button type=\"submit\">Update</button>\
         </form>\
         <a href=\"/users\">Back</a>\
         </body></html>",
        id = view.user.id,
        token = view.csrf_token.value(),
    )
}
