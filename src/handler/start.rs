use crate::{
    handler::{Request, Response},
    util::text::*,
};

pub async fn handle(req: &Request) -> Result<Response<'_>, Response<'_>> {
    let name = &req.me().first_name;

    Ok(Response::reply_to(
        mtb()
            .bold(format!("{name} counts down to your exams.\n\n"))
            .code("/gen")
            .plain(" countdown card until 3 May 2026\n")
            .code("/neet")
            .plain(" ")
            .code("/jee")
            .plain(" countdown dashboards\n")
            .code("/quote")
            .plain(" a random motivational quote\n")
            .code("/me")
            .plain(" your user info\n\n")
            .bold("Group admins\n")
            .code("/ban /unban /kick /mute /unmute /warn /promote /demote")
            .plain(" reply to a user or pass ")
            .code("@username")
            .plain("\n")
            .code("/info")
            .plain(" reply to a user to show their info\n\n")
            .italic("Commands are case-insensitive.")
            .build(),
    )
    .disable_preview())
}
